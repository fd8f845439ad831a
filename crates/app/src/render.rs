//! Text rendering of the client screens.
//!
//! Whether fancy output is available depends on the environment, so the
//! probing sits behind a trait injected into the render functions instead of
//! being checked inline.

use std::env;

use broadcast::session::RunnerPosition;
use itertools::Itertools;
use model::{
    broadcast::CheckpointReport,
    home::HomeData,
    race::{RaceDetail, RaceSummary},
    runner::RunnerSearchResult,
};

/// What the output device can display.
pub trait RenderCapabilities {
    fn supports_unicode(&self) -> bool;
    fn supports_color(&self) -> bool;
}

/// Capabilities probed from the terminal environment.
pub struct TermCapabilities {
    unicode: bool,
    color: bool,
}

impl TermCapabilities {
    pub fn detect() -> Self {
        let lang = env::var("LANG").unwrap_or_default().to_uppercase();
        let term = env::var("TERM").unwrap_or_default();
        Self {
            unicode: lang.contains("UTF-8") || lang.contains("UTF8"),
            color: term != "dumb" && !term.is_empty() && env::var("NO_COLOR").is_err(),
        }
    }
}

impl RenderCapabilities for TermCapabilities {
    fn supports_unicode(&self) -> bool {
        self.unicode
    }

    fn supports_color(&self) -> bool {
        self.color
    }
}

/// Fixed plain-text capabilities, used by tests and piped output.
pub struct Plain;

impl RenderCapabilities for Plain {
    fn supports_unicode(&self) -> bool {
        false
    }

    fn supports_color(&self) -> bool {
        false
    }
}

fn bullet(caps: &dyn RenderCapabilities) -> &'static str {
    if caps.supports_unicode() {
        "●"
    } else {
        "*"
    }
}

fn status_text(status: model::runner::RunnerStatus, caps: &dyn RenderCapabilities) -> String {
    if caps.supports_color() {
        // green for running, blue for finish, red for DNF, default otherwise
        let color = match status {
            model::runner::RunnerStatus::Running => "\x1b[32m",
            model::runner::RunnerStatus::Finish => "\x1b[34m",
            model::runner::RunnerStatus::Dnf => "\x1b[31m",
            _ => "",
        };
        format!("{}{}\x1b[0m", color, status)
    } else {
        status.to_string()
    }
}

pub fn render_home(home: &HomeData) -> String {
    let mut out = format!("{} 님의 홈\n", home.member_name);
    if let Some(best) = &home.best_full_record {
        out.push_str(&format!("  FULL 최고기록 {}\n", best.best_record));
    }
    if let Some(best) = &home.best_half_record {
        out.push_str(&format!("  HALF 최고기록 {}\n", best.best_record));
    }
    if let Some(best) = &home.best_ten_record {
        out.push_str(&format!("  10K 최고기록 {}\n", best.best_record));
    }
    out.push_str(&format!("  다가오는 대회 {}개\n", home.race_infos.len()));
    out
}

pub fn render_races(races: &[RaceSummary]) -> String {
    races
        .iter()
        .map(|race| {
            let courses = race.race_courses.iter().map(|c| c.display_name()).join("/");
            format!(
                "[{}] {} — {} ({})",
                race.race_id, race.race_title, race.race_date, courses
            )
        })
        .join("\n")
}

pub fn render_race_detail(detail: &RaceDetail) -> String {
    let mut out = render_races(std::slice::from_ref(&detail.race_info));
    out.push('\n');
    match &detail.race_member_info {
        Some(member) => {
            out.push_str(&format!("  내 배번 #{} ({})\n", member.bib, member.course))
        }
        None => out.push_str("  등록된 배번 없음\n"),
    }
    for group in &detail.group_info {
        out.push_str(&format!(
            "  응원 그룹: {} (broadcast {})\n",
            group.group_title, group.broadcast_key
        ));
    }
    out
}

pub fn render_search_results(results: &[RunnerSearchResult]) -> String {
    if results.is_empty() {
        return "검색 결과가 없습니다.".to_owned();
    }
    results
        .iter()
        .map(|runner| {
            format!(
                "#{} {} ({}){}",
                runner.bib,
                runner.member_name,
                runner.course,
                runner
                    .unique_code
                    .as_ref()
                    .map(|code| format!(" code {}", code))
                    .unwrap_or_default()
            )
        })
        .join("\n")
}

/// The checkpoint list view of a broadcast.
pub fn render_list_view(
    reports: &[CheckpointReport],
    caps: &dyn RenderCapabilities,
) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!(
            "{} {} ({}km) — {}\n",
            bullet(caps),
            report.course_title,
            report.point,
            report.pass_status
        ));
        for member in &report.race_members {
            out.push_str(&format!(
                "    #{} {} {:.1}km {} {}\n",
                member.bib,
                member.member_name,
                member.expected_distance,
                member
                    .avg_pace
                    .map(|pace| pace.to_string())
                    .unwrap_or_else(|| "--:--".to_owned()),
                status_text(member.status, caps),
            ));
        }
    }
    out
}

/// The map view of a broadcast: resolved coordinates, leaders first.
pub fn render_map_view(
    positions: &[RunnerPosition],
    caps: &dyn RenderCapabilities,
) -> String {
    positions
        .iter()
        .sorted_by(|a, b| {
            b.member
                .expected_distance
                .total_cmp(&a.member.expected_distance)
        })
        .map(|position| {
            format!(
                "{} {} @ ({:.5}, {:.5}) {}",
                bullet(caps),
                position.member.member_name,
                position.coordinate.latitude,
                position.coordinate.longitude,
                status_text(position.member.status, caps),
            )
        })
        .join("\n")
}
