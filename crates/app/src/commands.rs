use std::error::Error;

use broadcast::session::LiveSession;
use model::{course::Course, race::BibRegistration, runner::SearchKind};
use race_api::{auth::TokenStore, client::RaceApiClient};
use utility::id::Id;

use crate::render::{self, RenderCapabilities};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Home,
    Races,
    Race(i64),
    Register {
        race_id: i64,
        bib: String,
        course: Course,
        target: Option<String>,
    },
    Search {
        race_id: i64,
        kind: SearchKind,
        query: String,
    },
    Broadcast {
        key: String,
        course: Option<Course>,
    },
}

/// Accepts both wire labels ("THIRTY_TWO_K") and display names ("32K").
fn parse_course(label: &str) -> Result<Course, String> {
    match label.to_uppercase().as_str() {
        "FIVE" | "5K" => Ok(Course::Five),
        "TEN" | "10K" => Ok(Course::Ten),
        "ELEVEN" | "11K" => Ok(Course::Eleven),
        "HALF" => Ok(Course::Half),
        "THIRTY_TWO_K" | "32K" => Ok(Course::ThirtyTwoK),
        "FULL" => Ok(Course::Full),
        _ => Err(format!("unknown course '{}'", label)),
    }
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut words = args.iter().map(String::as_str);
        let command = match words.next() {
            None | Some("home") => Command::Home,
            Some("races") => Command::Races,
            Some("race") => {
                let id = words
                    .next()
                    .ok_or("usage: race <race-id>")?
                    .parse()
                    .map_err(|_| "race id must be a number".to_owned())?;
                Command::Race(id)
            }
            Some("register") => {
                let race_id = words
                    .next()
                    .ok_or("usage: register <race-id> <bib> <course> [target]")?
                    .parse()
                    .map_err(|_| "race id must be a number".to_owned())?;
                let bib = words
                    .next()
                    .ok_or("usage: register <race-id> <bib> <course> [target]")?
                    .to_owned();
                let course = parse_course(
                    words
                        .next()
                        .ok_or("usage: register <race-id> <bib> <course> [target]")?,
                )?;
                Command::Register {
                    race_id,
                    bib,
                    course,
                    target: words.next().map(str::to_owned),
                }
            }
            Some("search") => {
                let race_id = words
                    .next()
                    .ok_or("usage: search <race-id> name|bib|code <query>")?
                    .parse()
                    .map_err(|_| "race id must be a number".to_owned())?;
                let kind = match words.next() {
                    Some("name") => SearchKind::Name,
                    Some("bib") => SearchKind::Bib,
                    Some("code") => SearchKind::Code,
                    _ => return Err("search kind must be name, bib or code".to_owned()),
                };
                let query = words
                    .next()
                    .ok_or("usage: search <race-id> name|bib|code <query>")?
                    .to_owned();
                Command::Search {
                    race_id,
                    kind,
                    query,
                }
            }
            Some("broadcast") => {
                let key = words
                    .next()
                    .ok_or("usage: broadcast <broadcast-key> [course]")?
                    .to_owned();
                let course = match words.next() {
                    Some(label) => Some(parse_course(label)?),
                    None => None,
                };
                Command::Broadcast { key, course }
            }
            Some(other) => return Err(format!("unknown command '{}'", other)),
        };
        Ok(command)
    }
}

pub async fn run<S>(
    client: &RaceApiClient<S>,
    command: Command,
    caps: &dyn RenderCapabilities,
) -> Result<(), Box<dyn Error>>
where
    S: TokenStore,
{
    match command {
        Command::Home => {
            let home = client.home().await?;
            print!("{}", render::render_home(&home));
        }
        Command::Races => {
            let races = client.races().await?;
            println!("{}", render::render_races(&races));
        }
        Command::Race(id) => {
            let detail = client.race_detail(&Id::new(id)).await?;
            print!("{}", render::render_race_detail(&detail));
        }
        Command::Register {
            race_id,
            bib,
            course,
            target,
        } => {
            let registration = BibRegistration {
                bib,
                course,
                target_record: target.as_deref().map(str::parse).transpose()?,
                outfit_img_url: None,
            };
            let member = client.register_bib(&Id::new(race_id), &registration).await?;
            println!("배번 #{} 등록 완료 ({})", member.bib, member.course);
        }
        Command::Search {
            race_id,
            kind,
            query,
        } => {
            let results = client
                .search_runners(&Id::new(race_id), kind, &query)
                .await?;
            println!("{}", render::render_search_results(&results));
        }
        Command::Broadcast { key, course } => {
            let key = Id::new(key);
            let info = client.broadcast_info(&key).await?;

            // route payload and roster are independent fetches
            let (map, snapshot) = futures::try_join!(
                client.map_data(&info.map_url),
                client.live_snapshot(&key, course),
            )?;

            let mut session = LiveSession::new(info, map)?;
            session.set_course_filter(course)?;
            session.replace_snapshot(snapshot);

            println!("== {} ==", session.info().race_group_info.race_title);
            print!("{}", render::render_list_view(&session.list_view(), caps));
            println!("-- map --");
            println!("{}", render::render_map_view(&session.map_view(), caps));
        }
    }
    Ok(())
}
