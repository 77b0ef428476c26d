//! Human-readable event lines.

use std::collections::HashMap;

use battle_core::{ActionKind, BattleEvent, BattleState, UnitId};

/// Display names keyed by unit id, e.g. `Fox Sage#3`.
pub struct Names(HashMap<UnitId, String>);

impl Names {
    pub fn from_state(state: &BattleState) -> Self {
        Self(
            state
                .units
                .iter()
                .map(|u| (u.id, format!("{}{}", u.name, u.id)))
                .collect(),
        )
    }

    fn get(&self, id: UnitId) -> String {
        self.0.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    fn source(&self, id: Option<UnitId>) -> String {
        id.map_or_else(|| "status".to_string(), |id| self.get(id))
    }
}

pub fn describe(event: &BattleEvent, names: &Names) -> String {
    use BattleEvent::*;
    match event {
        TurnStarted { turn, actor } => format!("[{turn:>3}] {} acts", names.get(*actor)),
        ActionSkipped { actor, reason } => {
            format!("      {} skips ({reason})", names.get(*actor))
        }
        ActionResolved {
            actor,
            action,
            targets,
            total_damage,
            ..
        } => {
            let what = match action {
                ActionKind::Basic => "basic attack".to_string(),
                ActionKind::FollowUp => "follow-up attack".to_string(),
                ActionKind::Skill { skill } => format!("skill {skill}"),
            };
            format!(
                "      {} used {what} on {} target(s) for {total_damage}",
                names.get(*actor),
                targets.len()
            )
        }
        Damage {
            source,
            target,
            amount,
            absorbed,
            damage_type,
            crit,
        } => {
            let crit = if *crit { " CRIT" } else { "" };
            let absorbed = if *absorbed > 0 {
                format!(" ({absorbed} absorbed)")
            } else {
                String::new()
            };
            format!(
                "      {} hits {} for {amount} {damage_type}{crit}{absorbed}",
                names.source(*source),
                names.get(*target)
            )
        }
        Evaded { source, target } => format!(
            "      {} evades {}",
            names.get(*target),
            names.source(*source)
        ),
        StatusApplied {
            target,
            kind,
            magnitude,
            turns,
            ..
        } => format!(
            "      {} gains {kind} ({magnitude}) for {turns} turn(s)",
            names.get(*target)
        ),
        StatusResisted { target, kind } => {
            format!("      {} resists {kind}", names.get(*target))
        }
        StatusTicked {
            target,
            kind,
            damage,
        } => format!("      {} takes {damage} from {kind}", names.get(*target)),
        StatusExpired { target, kind } => {
            format!("      {} is no longer affected by {kind}", names.get(*target))
        }
        Cleansed { target, kinds } => {
            format!("      {} is cleansed of {} effect(s)", names.get(*target), kinds.len())
        }
        Healed { target, amount } => format!("      {} heals {amount}", names.get(*target)),
        ShieldGained { target, amount } => {
            format!("      {} gains a {amount} shield", names.get(*target))
        }
        RageGained { target, amount } => {
            format!("      {} gains {amount} rage", names.get(*target))
        }
        Knockback {
            target,
            from_col,
            to_col,
        } => format!(
            "      {} is knocked from column {from_col} to {to_col}",
            names.get(*target)
        ),
        UnitDied { unit, killer } => match killer {
            Some(killer) => format!("      {} is slain by {}", names.get(*unit), names.get(*killer)),
            None => format!("      {} dies", names.get(*unit)),
        },
        CurrencyAwarded { side, amount } => format!("      {side} earns {amount} gold"),
        SpeedMultiplierChanged { multiplier } => format!("      speed x{multiplier:.2}"),
        DamageMultiplierChanged { multiplier } => {
            format!("      death match: damage x{multiplier:.2}")
        }
        BattleEnded(outcome) => match outcome.winner {
            Some(side) => format!("battle over: {side} wins by {}", outcome.reason),
            None => format!("battle over: draw ({})", outcome.reason),
        },
    }
}
