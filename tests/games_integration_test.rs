//! End-to-end game sessions driven through the public API

use luckbox::config::{ConfigLoader, LuckboxConfig, RouletteConfig};
use luckbox::games::{
    wait_for_disclosure, BetColor, CoinFlip, DiceRoll, DisclosureStatus, RngSource, RouletteTable,
    ScratchCard, ScratchTicket, ScriptedSource, SpinRejected, TablePhase,
};
use std::time::{Duration, Instant};

#[test]
fn test_roulette_session_from_config_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("luckbox.toml");

    let mut config = LuckboxConfig::instant();
    config.roulette.starting_balance = 300;
    ConfigLoader::new()
        .save(&config, path.to_str().expect("utf-8 path"))
        .expect("save config");

    let loaded = ConfigLoader::new().with_path(&path).load().expect("load config");
    assert_eq!(loaded.roulette.starting_balance, 300);

    // pocket 2 is black: three losing red bets empty the balance
    let mut table = RouletteTable::new(ScriptedSource::pocket(2), &loaded.roulette);
    let now = Instant::now();
    for expected in [200, 100, 0] {
        table.place_bet(BetColor::Red, now).expect("bet accepted");
        let report = table.spin(now).expect("spin accepted");
        assert_eq!(report.balance_after, expected);
    }

    table.place_bet(BetColor::Red, now).expect("bet accepted");
    assert_eq!(
        table.spin(now),
        Err(SpinRejected::InsufficientBalance { balance: 0, stake: 100 })
    );
}

#[test]
fn test_roulette_reports_match_disclosures() {
    let config = RouletteConfig {
        spin_delay_ms: 4_000,
        ..Default::default()
    };
    let mut table = RouletteTable::new(RngSource::seeded(17), &config);
    let mut clock = Instant::now();
    let mut balance = config.starting_balance;

    for _ in 0..20 {
        table.place_bet(BetColor::Black, clock).expect("bet accepted");
        let spun = table.spin(clock).expect("spin accepted");
        assert_eq!(table.phase(clock), TablePhase::Spinning);

        balance += if spun.won { spun.payout - spun.stake } else { -spun.stake };
        assert_eq!(spun.balance_after, balance);

        clock += Duration::from_millis(4_000);
        assert_eq!(table.poll(spun.round, clock), DisclosureStatus::Ready(spun));
        assert_eq!(table.phase(clock), TablePhase::Settled);
    }
    assert_eq!(table.balance(), balance);
}

#[tokio::test]
async fn test_rerolled_dice_never_shows_stale_face() {
    let mut dice = DiceRoll::new(RngSource::seeded(5), Duration::from_millis(30));
    let first = dice.roll(Instant::now());
    let second = dice.roll(Instant::now());

    assert_eq!(wait_for_disclosure(dice.gate_mut(), first).await, None);
    let face = wait_for_disclosure(dice.gate_mut(), second)
        .await
        .expect("latest round is disclosed");
    assert!((1..=6).contains(&face.value()));
}

#[tokio::test]
async fn test_coin_waits_out_delay() {
    let mut coin = CoinFlip::new(RngSource::seeded(6), Duration::from_millis(25));
    let started = Instant::now();
    let round = coin.flip(started);
    assert!(coin.is_flipping(started));

    let face = wait_for_disclosure(coin.gate_mut(), round).await;
    assert!(face.is_some());
    assert!(started.elapsed() >= Duration::from_millis(25));
}

#[test]
fn test_scratch_card_full_cycle() {
    let config = LuckboxConfig::default();
    let mut card = ScratchCard::new(RngSource::seeded(12), &config.scratch);

    for ticket_no in 0..5 {
        assert_eq!(card.surface().uncovered_fraction(), 0.0, "ticket {}", ticket_no);
        assert_eq!(card.disclosed_win(), None);

        // one pass over the card with the default brush
        for y in (0..=300).step_by(30) {
            for x in (0..=400).step_by(30) {
                card.scratch(x as f64, y as f64);
            }
        }
        assert!(card.is_revealed());
        assert_eq!(card.disclosed_win(), Some(card.ticket().total_win()));
        card.new_ticket();
    }
}

#[test]
fn test_ticket_serializes_with_prize_labels() {
    let ticket = ScratchTicket::from_labels(
        7,
        &[(7, "$10"), (7, "$5"), (3, "$50"), (1, "$100"), (7, "$500"), (5, "$1000")],
    )
    .expect("valid ticket");
    let value = serde_json::to_value(&ticket).expect("serialize");
    assert_eq!(value["total_win"], 515);
    assert_eq!(value["cells"][5]["prize"], "$1000");

    let back: ScratchTicket = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, ticket);
}
