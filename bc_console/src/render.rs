//! Plain-text rendering of clock views and events.

use blind_clock::{
    countdown::CountdownStatus,
    display::{self, format_amount},
    notify::ClockEvent,
    tournament::TournamentView,
};
use std::fmt::Write;

/// Terminal bell, standing in for the alert sound
const BELL: char = '\u{7}';

/// Multi-line status block
pub fn render_view(view: &TournamentView) -> String {
    let mut out = String::new();
    let status = match view.countdown.status {
        CountdownStatus::Idle => "ready",
        CountdownStatus::Running => "running",
        CountdownStatus::Paused => "paused",
        CountdownStatus::Complete => "complete",
    };

    let _ = writeln!(out, "== {} ({}) ==", view.title, view.structure_name);
    let _ = writeln!(
        out,
        "Level {}/{}  {}  [{}]",
        view.level_position, view.level_count, view.clock, status
    );

    match &view.current_level {
        Some(level) if level.ante > 0 => {
            let _ = writeln!(
                out,
                "Blinds {}/{} ante {}",
                level.small_blind, level.big_blind, level.ante
            );
        }
        Some(level) => {
            let _ = writeln!(out, "Blinds {}/{}", level.small_blind, level.big_blind);
        }
        None => {}
    }

    match &view.next_level {
        Some(next) => {
            let _ = writeln!(out, "Next   {}/{}", next.small_blind, next.big_blind);
        }
        None => {
            let _ = writeln!(out, "Final level");
        }
    }

    let _ = writeln!(
        out,
        "Buy-ins {}  Re-buys {}  Pool {}",
        view.buy_ins,
        view.re_buys,
        format_amount(&view.currency, view.prize_pool)
    );
    out.push_str("Prizes");
    for (position, place) in [(1, "1st"), (2, "2nd"), (3, "3rd")] {
        if let Some(amount) = view.prizes.payout_for_position(position) {
            let _ = write!(out, "  {} {}", place, format_amount(&view.currency, amount));
        }
    }
    out.push('\n');

    if let Some(warning) = &view.distribution_warning {
        let _ = writeln!(out, "Warning: {}", warning);
    }
    if view.alert_active {
        let _ = writeln!(out, "*** LEVEL COMPLETE *** (type 'dismiss')");
    }
    if view.advance_pending {
        let _ = writeln!(out, "Advancing to the next level shortly");
    }

    out
}

/// One line for an event, or `None` for events not worth printing
pub fn render_event(event: &ClockEvent) -> Option<String> {
    match event {
        ClockEvent::Tick { remaining_secs } if *remaining_secs > 0 && remaining_secs % 60 == 0 => {
            Some(format!("{} remaining", display::format_clock(*remaining_secs)))
        }
        ClockEvent::Tick { .. } | ClockEvent::Click => None,
        ClockEvent::TimeChanged { remaining_secs } => {
            Some(format!("Clock set to {}", display::format_clock(*remaining_secs)))
        }
        ClockEvent::FinalCountdown { remaining_secs, .. } => {
            Some(format!("{}Level ends in {} seconds", BELL, remaining_secs))
        }
        ClockEvent::LevelCompleted { next, .. } => Some(match next {
            Some(next) => format!(
                "{}{}",
                BELL,
                display::blind_change_message(next.small_blind, next.big_blind)
            ),
            None => format!("{}Final level complete", BELL),
        }),
        ClockEvent::LevelAdvanced { level } => Some(display::describe_level(level)),
        ClockEvent::BuyInAdded { buy_ins } => Some(format!("Buy-ins: {}", buy_ins)),
        ClockEvent::ReBuyAdded { re_buys } => Some(format!("Re-buys: {}", re_buys)),
        ClockEvent::TournamentReset { cleared: true } => {
            Some("Tournament reset to defaults".to_string())
        }
        ClockEvent::TournamentReset { cleared: false } => {
            Some("Tournament restarted from the first level".to_string())
        }
    }
}
