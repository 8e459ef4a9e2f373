use clap::{Parser, Subcommand};
use midnight_honey::config::GrooveConfig;
use midnight_honey::player::Player;
use midnight_honey::rhythm::{timeline, BeatPlan};
use midnight_honey::session::{PlayState, Session};
use midnight_honey::sheet::{now_playing_line, render_sheet, SheetData};
use midnight_honey::song;
use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "midnight-honey", about = "Swung jazz groove with lyrics and chords")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the groove (Enter toggles Play/Pause, q quits)
    Play,
    /// Print the lyric/chord sheet
    Sheet {
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
        /// Highlight a section (1-based)
        #[arg(short, long)]
        section: Option<usize>,
    },
    /// Print the beat events the scheduler produces
    Timeline {
        /// Number of bars to print
        #[arg(short, long, default_value = "4")]
        bars: u64,
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the groove constants
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play => run_play(),
        Commands::Sheet { json, section } => run_sheet(json, section),
        Commands::Timeline { bars, json } => run_timeline(bars, json),
        Commands::Config => serde_json::to_string_pretty(&GrooveConfig::default())
            .map(|s| println!("{}", s))
            .map_err(|e| format!("Serialize error: {}", e)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_sheet(json: bool, section: Option<usize>) -> Result<(), String> {
    let count = song::sections().len();
    let active = match section {
        Some(n) if n >= 1 && n <= count => Some(n - 1),
        Some(n) => {
            return Err(format!(
                "section {} out of range (song has {} sections)",
                n, count
            ));
        }
        None => None,
    };
    let data = SheetData::new(active, "Play Groove");
    if json {
        println!("{}", data.to_json()?);
    } else {
        print!("{}", render_sheet(&data));
    }
    Ok(())
}

fn run_timeline(bars: u64, json: bool) -> Result<(), String> {
    let config = GrooveConfig::default();
    let plans = timeline(&config, bars)?;
    if json {
        let out =
            serde_json::to_string_pretty(&plans).map_err(|e| format!("Serialize error: {}", e))?;
        println!("{}", out);
        return Ok(());
    }
    println!(
        "{} BPM, swing {}, beat {:.3}s, bar {:.3}s",
        config.tempo,
        config.swing_ratio,
        config.beat_duration(),
        config.bar_duration()
    );
    for plan in &plans {
        println!("{}", describe_beat(plan));
    }
    Ok(())
}

fn describe_beat(plan: &BeatPlan) -> String {
    let mut voices = vec!["hat"];
    if plan.ride {
        voices.push("ride");
    }
    if plan.bass_hz.is_some() {
        voices.push("bass");
    }
    if plan.pad_hz.is_some() {
        voices.push("pad");
    }
    let bass = plan
        .bass_hz
        .map(|hz| format!(" bass {:.2}Hz", hz))
        .unwrap_or_default();
    format!(
        "{:>8.3}s  bar {:>3} beat {}  {:<7} {:<7} {}{}",
        plan.time,
        plan.position.bar + 1,
        plan.position.beat_in_bar + 1,
        song::sections()[plan.section].title,
        plan.chord,
        voices.join("+"),
        bass
    )
}

/// Forward lines from `input` to the play loop so it can keep refreshing the
/// highlight while waiting for input.
fn spawn_line_reader<R>(input: R) -> Result<mpsc::Receiver<String>, String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .map_err(|e| format!("Failed to start input reader: {}", e))?;
    Ok(rx)
}

fn run_play() -> Result<(), String> {
    let mut session = Session::<Player>::new(GrooveConfig::default(), Box::new(Player::new));

    print!(
        "{}",
        render_sheet(&SheetData::new(Some(0), session.button_label()))
    );
    println!();
    println!("Press Enter to Play/Pause, 'q' + Enter to quit.");

    let rx = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))?;
    let mut shown_bar: Option<u64> = None;

    loop {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(line) => {
                if line.trim().eq_ignore_ascii_case("q") {
                    break;
                }
                match session.toggle() {
                    Ok(PlayState::Playing) => {
                        println!("[ {} ]", session.button_label());
                        shown_bar = None;
                    }
                    Ok(state) => {
                        let status = session.status();
                        println!(
                            "[ {} ] {} at {:.1}s",
                            session.button_label(),
                            state,
                            status.elapsed_secs
                        );
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if !session.is_playing() {
                    continue;
                }
                let status = session.status();
                if shown_bar != Some(status.bar) {
                    shown_bar = Some(status.bar);
                    println!(
                        "{}",
                        now_playing_line(status.section_index, status.chord, status.bar)
                    );
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    session.stop();
    println!("Groove stopped.");
    Ok(())
}
