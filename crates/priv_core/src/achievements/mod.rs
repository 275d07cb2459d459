use std::collections::BTreeSet;

use crate::error::RuleError;
use crate::savedata::{GameVariant, Savedata};
use crate::tables::{self, BaseId, BaseKind};

mod list;

pub use list::{categories, rf_categories};

/// Everything a rule may look at: the decoded save plus the accumulated
/// per-identity discovery state.
pub struct EvalContext<'a> {
    pub save: &'a Savedata,
    pub visited: &'a BTreeSet<BaseId>,
    /// One bit per ship id, set once that hull had the secret compartment.
    pub secrets: u8,
}

/// How an achievement decides it is earned. Data variants cover the common
/// shapes; anything odder is a predicate function.
pub enum Rule {
    Kills { faction: usize, at_least: i32 },
    TotalKills { at_least: i32 },
    /// Plot has moved past series `n` (or sits at its end, completed).
    SeriesCompleted { series: u8 },
    PlotFinished,
    PlotFailed,
    VisitAll { bases: &'static [BaseId] },
    VisitKind { kind: BaseKind },
    FlagsAll { flags: &'static [usize] },
    Predicate { test: fn(&EvalContext) -> Result<bool, RuleError> },
}

pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
    /// Multi-step achievements report progress text while locked.
    pub multi: bool,
    pub rule: Rule,
}

pub struct Category {
    pub name: &'static str,
    pub cheeves: &'static [Achievement],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub unlocked: bool,
    pub progress: Option<String>,
}

/// Result of one rule against one save. `error` is set when the rule could
/// not be evaluated; the achievement simply stays locked in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub unlocked: bool,
    pub progress: Option<String>,
    pub error: Option<String>,
}

fn kills(ctx: &EvalContext, faction: usize) -> Result<i32, RuleError> {
    ctx.save
        .kills(faction)
        .map(i32::from)
        .ok_or_else(|| RuleError::new(format!("no kill count for faction {faction}")))
}

fn total_kills(ctx: &EvalContext) -> Result<i32, RuleError> {
    let mut total = 0;
    for faction in 0..tables::FACTIONS.len() {
        total += kills(ctx, faction)?;
    }
    Ok(total)
}

fn plot_series_state(ctx: &EvalContext) -> Result<Option<(u8, bool)>, RuleError> {
    let info = ctx
        .save
        .plot_info()
        .ok_or_else(|| RuleError::new("no plot chunk"))?;
    if !info.started() {
        return Ok(None);
    }
    match info.series() {
        Some(series) => Ok(Some((series, info.completed()))),
        None => Err(RuleError::new(format!(
            "unrecognized plot stage {:?}",
            info.mission
        ))),
    }
}

fn visit_progress(ctx: &EvalContext, bases: &[BaseId]) -> Outcome {
    let seen = bases.iter().filter(|b| ctx.visited.contains(b)).count();
    Outcome {
        unlocked: seen == bases.len(),
        progress: Some(format!("{seen}/{}", bases.len())),
    }
}

pub fn evaluate(a: &Achievement, ctx: &EvalContext) -> Result<Outcome, RuleError> {
    let done = |unlocked: bool| Outcome {
        unlocked,
        progress: None,
    };
    match &a.rule {
        Rule::Kills { faction, at_least } => Ok(done(kills(ctx, *faction)? >= *at_least)),
        Rule::TotalKills { at_least } => Ok(done(total_kills(ctx)? >= *at_least)),
        Rule::SeriesCompleted { series } => {
            let unlocked = match plot_series_state(ctx)? {
                Some((s, completed)) => s > *series || (s == *series && completed),
                None => false,
            };
            Ok(done(unlocked))
        }
        Rule::PlotFinished => {
            let unlocked = matches!(plot_series_state(ctx)?, Some((s, true)) if s >= 7);
            Ok(done(unlocked))
        }
        Rule::PlotFailed => {
            let info = ctx
                .save
                .plot_info()
                .ok_or_else(|| RuleError::new("no plot chunk"))?;
            Ok(done(info.failed()))
        }
        Rule::VisitAll { bases } => Ok(visit_progress(ctx, bases)),
        Rule::VisitKind { kind } => {
            let bases: Vec<BaseId> = tables::bases_of_kind(*kind).map(|b| b.id).collect();
            Ok(visit_progress(ctx, &bases))
        }
        Rule::FlagsAll { flags } => Ok(done(ctx.save.flags_all(flags))),
        Rule::Predicate { test } => Ok(done(test(ctx)?)),
    }
}

/// Run every rule for `game`. A failing rule never aborts the sweep: it is
/// reported locked, with the failure recorded for the caller to log.
pub fn evaluate_all(game: GameVariant, ctx: &EvalContext) -> Vec<RuleResult> {
    let mut results = Vec::new();
    for category in categories() {
        let mut sets: Vec<&Category> = vec![category];
        if game == GameVariant::RighteousFire {
            sets.extend(
                rf_categories()
                    .iter()
                    .filter(|c| c.name == category.name),
            );
        }
        for set in sets {
            for cheev in set.cheeves {
                let result = match evaluate(cheev, ctx) {
                    Ok(outcome) => RuleResult {
                        id: cheev.id,
                        name: cheev.name,
                        desc: cheev.desc,
                        category: category.name,
                        unlocked: outcome.unlocked,
                        progress: if cheev.multi { outcome.progress } else { None },
                        error: None,
                    },
                    Err(e) => RuleResult {
                        id: cheev.id,
                        name: cheev.name,
                        desc: cheev.desc,
                        category: category.name,
                        unlocked: false,
                        progress: None,
                        error: Some(e.to_string()),
                    },
                };
                results.push(result);
            }
        }
    }
    results
}

/// Plot stages that prove the player has been somewhere, in plot order. The
/// save only stores the current location, so past stops are deduced.
const PLOT_STOPS: &[(&str, BaseId)] = &[
    ("s0ma", tables::BASE_NEW_DETROIT),
    ("s1mb", tables::BASE_OAKHAM),
    ("s1mc", tables::BASE_HECTOR),
    ("s1md", tables::BASE_NEW_CONSTANTINOPLE),
    ("s2mc", tables::BASE_SIVA),
    ("s2md", tables::BASE_REMUS),
    ("s3ma", tables::BASE_OXFORD),
    ("s4ma", tables::BASE_BASRA),
    ("s4md", tables::BASE_PALAN),
    ("s5ma", tables::BASE_RYGANNON),
    ("s6ma", tables::BASE_DERELICT),
    ("s7mb", tables::BASE_PERRY),
];

/// Fold one save into the per-identity discovery state: where the player is
/// docked now, everywhere the plot position implies they have been, the
/// derelict if a Steltek gun is aboard, and the secret-compartment bit for
/// the current hull.
pub fn update_discoveries(save: &Savedata, visited: &mut BTreeSet<BaseId>, secrets: &mut u8) {
    if let Some(location) = save.location() {
        visited.insert(location);
    }

    if let Some(info) = save.plot_info() {
        if info.started() && info.series().is_some() {
            for &(stage, base) in PLOT_STOPS {
                // sNmX ids order lexicographically.
                if info.mission.as_str() >= stage {
                    visited.insert(base);
                }
            }
        }
    }

    if save.detected_game() == GameVariant::Privateer
        && save
            .guns()
            .iter()
            .any(|&(_, gun)| gun >= tables::GUN_STELTEK)
    {
        visited.insert(tables::BASE_DERELICT);
    }

    if let (Some(ship), Some(true)) = (save.ship(), save.secret_compartment()) {
        if ship < 8 {
            *secrets |= 1 << ship;
        }
    }
}
