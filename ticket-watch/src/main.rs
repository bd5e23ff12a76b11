use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_watch::domain::{Station, Ticket, TicketQuery, TimeWindow};
use ticket_watch::query::{DecodePolicy, TicketClient, TicketClientConfig};
use ticket_watch::stations::{
    StationChooser, StationClient, StationClientConfig, StationDirectory, bootstrap_directory,
};
use ticket_watch::watch::{Poller, WatchConfig};

const USAGE: &str = "Usage: ticket-watch <from> <to> <YYMMDD>

Environment:
  TICKET_WATCH_INTERVAL_SECS  keep polling with this pause between queries
  TICKET_WATCH_WINDOW         only report departures in HH:MM-HH:MM
  TICKET_WATCH_STRICT         drop malformed records instead of zeroing fields
  TICKET_WATCH_BASE_URL       booking service base URL
  TICKET_WATCH_OFFLINE        use the built-in station table only";

/// Everything the command line and environment decide.
struct Settings {
    from: String,
    to: String,
    date: NaiveDate,
    interval: Option<Duration>,
    window: Option<TimeWindow>,
    strict: bool,
    base_url: Option<String>,
    offline: bool,
}

impl Settings {
    fn parse(args: &[String]) -> Result<Self, String> {
        let [from, to, date] = args else {
            return Err(USAGE.to_string());
        };
        let date = NaiveDate::parse_from_str(date, "%y%m%d")
            .map_err(|_| format!("failed to parse date '{date}', should be in form 'YYMMDD'"))?;

        let interval = match env("TICKET_WATCH_INTERVAL_SECS") {
            Some(secs) => Some(Duration::from_secs(secs.parse().map_err(|_| {
                format!("TICKET_WATCH_INTERVAL_SECS must be a number, got '{secs}'")
            })?)),
            None => None,
        };
        let window = env("TICKET_WATCH_WINDOW")
            .map(|w| TimeWindow::parse(&w))
            .transpose()
            .map_err(|e| e.to_string())?;

        Ok(Self {
            from: from.clone(),
            to: to.clone(),
            date,
            interval,
            window,
            strict: env_flag("TICKET_WATCH_STRICT"),
            base_url: env("TICKET_WATCH_BASE_URL"),
            offline: env_flag("TICKET_WATCH_OFFLINE"),
        })
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_flag(name: &str) -> bool {
    env(name).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Asks on the terminal which of several matching stations was meant.
struct PromptChooser;

impl StationChooser for PromptChooser {
    fn choose(&self, pattern: &str, candidates: &[&Station]) -> Option<usize> {
        println!("[CHOSE] '{pattern}'有多个匹配的车站如下：");
        for (i, station) in candidates.iter().enumerate() {
            if i % 2 == 0 {
                print!("      {i:>4} - {}", station.name);
                if i == candidates.len() - 1 {
                    println!();
                }
            } else {
                println!("\t\t\t{i:>4} - {}", station.name);
            }
        }
        print!("[ENTER] 上列车站中对应'{pattern}'的序号：");
        io::stdout().flush().ok()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        line.trim().parse().ok()
    }
}

async fn load_stations(settings: &Settings) -> StationDirectory {
    if settings.offline {
        return bootstrap_directory();
    }

    let mut config = StationClientConfig::default();
    if let Some(url) = &settings.base_url {
        config = config.with_base_url(url);
    }

    let fetched = match StationClient::new(config) {
        Ok(client) => client.fetch_all().await,
        Err(e) => Err(e),
    };
    match fetched {
        Ok(directory) if !directory.is_empty() => {
            info!(count = directory.len(), "loaded station list");
            directory
        }
        Ok(_) => {
            warn!("station list is empty, using built-in stations");
            bootstrap_directory()
        }
        Err(e) => {
            warn!(error = %e, "failed to fetch station list, using built-in stations");
            bootstrap_directory()
        }
    }
}

fn print_table(directory: &StationDirectory, query: &TicketQuery, tickets: &[Ticket]) {
    let from = directory.name_of(&query.from);
    let to = directory.name_of(&query.to);
    println!(
        "[QUERY] {}从{from}开往{to}尚有余票的列车如下：",
        query.date.format("%Y年%m月%d日")
    );
    println!("        车次     出发   到达   二等座   无座");
    println!("        -------------------------------------");
    for ticket in tickets {
        println!(
            "        {:<5}   {}   {}   {}\t{}",
            ticket.train,
            ticket.depart.format("%H:%M"),
            ticket.arrive.format("%H:%M"),
            ticket.second_class,
            ticket.standing
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match Settings::parse(&args) {
        Ok(settings) => settings,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let directory = load_stations(&settings).await;

    let resolved = directory
        .resolve(&settings.from, &PromptChooser)
        .and_then(|from| Ok((from, directory.resolve(&settings.to, &PromptChooser)?)));
    let (from, to) = match resolved {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "failed to resolve station pattern");
            return ExitCode::FAILURE;
        }
    };
    info!(from = %from, to = %to, "resolved stations");

    let mut config = TicketClientConfig::default();
    if let Some(url) = &settings.base_url {
        config = config.with_base_url(url);
    }
    if settings.strict {
        config = config.with_decode_policy(DecodePolicy::Strict);
    }
    let client = match TicketClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create ticket client");
            return ExitCode::FAILURE;
        }
    };

    let query = TicketQuery::new(settings.date, from.code, to.code);
    let mut watch_config = WatchConfig::default();
    if let Some(window) = settings.window {
        watch_config = watch_config.with_window(window);
    }

    match settings.interval {
        Some(interval) => {
            let poller = Poller::new(&client, watch_config.with_interval(interval));
            let err = poller
                .run(&query, |ticket| {
                    let from = directory.name_of(&ticket.from);
                    let to = directory.name_of(&ticket.to);
                    println!("[FOUND] {}", ticket.with_names(from, to));
                })
                .await;
            error!(error = %err, "stopped polling");
            ExitCode::FAILURE
        }
        None => {
            let poller = Poller::new(&client, watch_config);
            match poller.poll_once(&query).await {
                Ok(tickets) => {
                    print_table(&directory, &query, &tickets);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "query failed");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
