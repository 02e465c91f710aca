//! Luckbox command line
//!
//! Plays single rounds of each game in the terminal and runs return-to-player
//! simulations.

use clap::{Parser, Subcommand, ValueEnum};
use luckbox::config::{ConfigLoader, LuckboxConfig};
use luckbox::errors::LuckboxResult;
use luckbox::games::{
    simulate_roulette, simulate_scratch, wait_for_disclosure, BetColor, CoinFlip, DiceRoll,
    DisclosureStatus, GameKind, RngSource, RouletteTable, ScratchCard, SpinReport,
};
use rand::rngs::StdRng;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "luckbox")]
#[command(about = "Casual chance games: dice, coin flip, scratch card and roulette")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible outcomes
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available games
    Games,
    /// Roll a six-sided die
    Dice {
        /// Show the result without the rolling delay
        #[arg(long)]
        no_delay: bool,
    },
    /// Flip a coin
    Coin {
        /// Show the result without the spinning delay
        #[arg(long)]
        no_delay: bool,
    },
    /// Bet on a colour at the roulette table
    Roulette {
        /// Colour to back each round (red or black)
        #[arg(short, long, default_value = "red")]
        bet: BetColor,

        /// Rounds to play on one balance
        #[arg(short, long, default_value = "1")]
        rounds: u32,

        /// Settle each spin without waiting for the wheel
        #[arg(long)]
        no_delay: bool,
    },
    /// Deal a Speeto ticket and scratch it until the result shows
    Scratch {
        /// Maximum number of brush strokes
        #[arg(long, default_value = "1000")]
        strokes: u32,
    },
    /// Estimate return to player over many rounds
    Simulate {
        #[arg(short, long, value_enum)]
        game: SimulatedGame,

        #[arg(short, long, default_value = "100000")]
        rounds: u64,

        /// Colour backed in roulette simulations
        #[arg(short, long, default_value = "red")]
        bet: BetColor,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SimulatedGame {
    Roulette,
    Scratch,
}

#[tokio::main]
async fn main() -> LuckboxResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;
    let source = random_source(cli.seed);

    match cli.command {
        Commands::Games => list_games(cli.json),
        Commands::Dice { no_delay } => {
            play_dice(&with_delays(config, no_delay), source, cli.json).await
        }
        Commands::Coin { no_delay } => {
            play_coin(&with_delays(config, no_delay), source, cli.json).await
        }
        Commands::Roulette {
            bet,
            rounds,
            no_delay,
        } => play_roulette(&with_delays(config, no_delay), source, bet, rounds, cli.json).await,
        Commands::Scratch { strokes } => play_scratch(&config, source, strokes, cli.json),
        Commands::Simulate { game, rounds, bet } => {
            let report = match game {
                SimulatedGame::Roulette => {
                    simulate_roulette(&config.roulette, source, bet, rounds)
                }
                SimulatedGame::Scratch => simulate_scratch(&config.scratch, source, rounds),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "luckbox=debug" } else { "luckbox=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn random_source(seed: Option<u64>) -> RngSource<StdRng> {
    match seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            RngSource::seeded(seed)
        }
        None => RngSource::from_entropy(),
    }
}

fn with_delays(config: LuckboxConfig, no_delay: bool) -> LuckboxConfig {
    if !no_delay {
        return config;
    }
    let instant = LuckboxConfig::instant();
    LuckboxConfig {
        roulette: luckbox::config::RouletteConfig {
            spin_delay_ms: instant.roulette.spin_delay_ms,
            ..config.roulette
        },
        quick: instant.quick,
        ..config
    }
}

fn list_games(json: bool) -> LuckboxResult<()> {
    if json {
        let games: Vec<_> = GameKind::ALL
            .iter()
            .map(|game| {
                json!({
                    "id": game,
                    "title": game.title(),
                    "tagline": game.tagline(),
                    "has_payout": game.has_payout(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&games)?);
        return Ok(());
    }
    for game in GameKind::ALL {
        let stakes = if game.has_payout() { "$" } else { " " };
        println!("{} {:<10} {:<12} {}", stakes, game.id(), game.title(), game.tagline());
    }
    Ok(())
}

async fn play_dice(
    config: &LuckboxConfig,
    source: RngSource<StdRng>,
    json: bool,
) -> LuckboxResult<()> {
    let mut dice = DiceRoll::new(source, config.dice_delay());
    let round = dice.roll(Instant::now());
    if !json {
        println!("Rolling...");
    }
    if let Some(face) = wait_for_disclosure(dice.gate_mut(), round).await {
        if json {
            println!("{}", json!({ "game": GameKind::Dice, "round": round, "face": face }));
        } else {
            println!("You rolled {}", face);
        }
    }
    Ok(())
}

async fn play_coin(
    config: &LuckboxConfig,
    source: RngSource<StdRng>,
    json: bool,
) -> LuckboxResult<()> {
    let mut coin = CoinFlip::new(source, config.coin_delay());
    let round = coin.flip(Instant::now());
    if !json {
        println!("Flipping...");
    }
    if let Some(face) = wait_for_disclosure(coin.gate_mut(), round).await {
        if json {
            println!("{}", json!({ "game": GameKind::Coin, "round": round, "face": face }));
        } else {
            println!("It's {}", face);
        }
    }
    Ok(())
}

async fn play_roulette(
    config: &LuckboxConfig,
    source: RngSource<StdRng>,
    bet: BetColor,
    rounds: u32,
    json: bool,
) -> LuckboxResult<()> {
    let mut table = RouletteTable::new(source, &config.roulette);
    let mut reports = Vec::new();

    for _ in 0..rounds {
        let now = Instant::now();
        if let Err(reason) = table.place_bet(bet, now) {
            warn!("{}", reason);
            break;
        }
        let spun = match table.spin(now) {
            Ok(report) => report,
            Err(reason) => {
                if !json {
                    println!("{}", reason);
                }
                break;
            }
        };
        if !json {
            println!("Spinning on {}...", bet);
        }
        if let Some(report) = await_spin(&mut table, spun).await {
            if !json {
                print_spin(&report);
            }
            reports.push(report);
        }
    }

    if json {
        let summary = json!({ "balance": table.balance(), "rounds": reports });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Balance: {}", table.balance());
    }
    Ok(())
}

/// Wait out the wheel, polling through the table so it settles the round
async fn await_spin(
    table: &mut RouletteTable<RngSource<StdRng>>,
    spun: SpinReport,
) -> Option<SpinReport> {
    loop {
        match table.poll(spun.round, Instant::now()) {
            DisclosureStatus::Ready(report) => return Some(report),
            DisclosureStatus::Superseded => return None,
            DisclosureStatus::Pending { remaining } => tokio::time::sleep(remaining).await,
        }
    }
}

fn print_spin(report: &SpinReport) {
    let verdict = if report.won {
        format!("WIN +{}", report.payout)
    } else {
        format!("LOSS -{}", report.stake)
    };
    println!(
        "  {} {} -> {}, balance {}",
        report.pocket, report.color, verdict, report.balance_after
    );
}

fn play_scratch(
    config: &LuckboxConfig,
    source: RngSource<StdRng>,
    max_strokes: u32,
    json: bool,
) -> LuckboxResult<()> {
    let mut card = ScratchCard::new(source, &config.scratch);
    let strokes = sweep_until_revealed(&mut card, max_strokes);
    let ticket = card.ticket();

    if json {
        let out = json!({
            "round": card.round(),
            "strokes": strokes,
            "uncovered_fraction": card.surface().uncovered_fraction(),
            "revealed": card.is_revealed(),
            "ticket": card.is_revealed().then_some(ticket),
            "win": card.disclosed_win(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Speeto 2000  No. {}", ticket.serial());
    println!(
        "{} strokes, {:.1}% scratched",
        strokes,
        card.surface().uncovered_fraction() * 100.0
    );
    match card.disclosed_win() {
        Some(win) => {
            println!("Lucky number: {}", ticket.lucky_number());
            for cell in ticket.cells() {
                let mark = if cell.value == ticket.lucky_number() { "*" } else { " " };
                println!("  {}{} {}", mark, cell.value, cell.prize);
            }
            if win > 0 {
                println!("YOU WON ${}!", win);
            } else {
                println!("No luck this time");
            }
        }
        None => println!("Not enough scratched to reveal the ticket"),
    }
    Ok(())
}

/// Raster sweep with a brush-radius stride. Returns the strokes used.
fn sweep_until_revealed(card: &mut ScratchCard<RngSource<StdRng>>, max_strokes: u32) -> u32 {
    let step = card.brush_radius().max(1.0);
    let width = card.surface().width() as f64;
    let height = card.surface().height() as f64;

    let mut strokes = 0;
    let mut y = 0.0;
    while y <= height && strokes < max_strokes {
        let mut x = 0.0;
        while x <= width && strokes < max_strokes {
            strokes += 1;
            if card.scratch(x, y).revealed {
                return strokes;
            }
            x += step;
        }
        y += step;
    }
    strokes
}
