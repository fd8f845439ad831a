/// Kilometers per degree of latitude. Longitude degrees shrink towards the
/// poles, but race courses are short and regional, so both axes are scaled
/// with the same factor. This matches the upstream map service, which places
/// runners with the same approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Flat-earth distance between two coordinates in kilometers:
/// `sqrt(dlat² + dlon²) * 111`. Not geodesically exact, kept deliberately so
/// that computed runner positions stay comparable with the original service.
pub fn flat_distance_km(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let dlat = latitude_2 - latitude_1;
    let dlon = longitude_2 - longitude_1;
    (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE
}

/// Linear interpolation between two scalars. `ratio` is expected in `[0, 1]`
/// but is not clamped.
pub fn lerp(from: f64, to: f64, ratio: f64) -> f64 {
    from + (to - from) * ratio
}
