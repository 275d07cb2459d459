use crate::error::RuleError;
use crate::tables::{self, BaseKind};

use super::{Achievement, Category, EvalContext, Rule};

// The shipped rule set. Ids are stable keys in the persisted state file;
// names and descriptions are display only and safe to reword.

fn credits(ctx: &EvalContext) -> Result<u32, RuleError> {
    ctx.save
        .credits()
        .ok_or_else(|| RuleError::new("no cargo info record"))
}

fn ship(ctx: &EvalContext) -> Result<u8, RuleError> {
    ctx.save.ship().ok_or_else(|| RuleError::new("no ship chunk"))
}

/// Cargo hold entries are 4-byte groups led by the commodity id.
fn has_cargo(ctx: &EvalContext, id: u8) -> bool {
    ctx.save
        .equipment()
        .and_then(|f| f.get(&["FITE", "CRGO", "DATA"]))
        .map(|r| r.data.chunks_exact(4).any(|entry| entry[0] == id))
        .unwrap_or(false)
}

fn plot_underway(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(super::plot_series_state(ctx)?.is_some())
}

fn t_tarsus_victor(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ship(ctx)? == tables::SHIP_TARSUS && super::total_kills(ctx)? >= 100)
}

fn t_tarsus_tycoon(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ship(ctx)? == tables::SHIP_TARSUS && credits(ctx)? >= 1_000_000)
}

fn t_tarsus_endgame(ctx: &EvalContext) -> Result<bool, RuleError> {
    let finished = matches!(super::plot_series_state(ctx)?, Some((s, true)) if s >= 7);
    Ok(finished && ship(ctx)? == tables::SHIP_TARSUS)
}

fn t_plot_started(ctx: &EvalContext) -> Result<bool, RuleError> {
    plot_underway(ctx)
}

fn t_own_orion(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ship(ctx)? == tables::SHIP_ORION)
}

fn t_own_centurion(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ship(ctx)? == tables::SHIP_CENTURION)
}

fn t_own_galaxy(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ship(ctx)? == tables::SHIP_GALAXY)
}

fn t_all_secrets(ctx: &EvalContext) -> Result<bool, RuleError> {
    let all = 1 << tables::SHIP_TARSUS
        | 1 << tables::SHIP_ORION
        | 1 << tables::SHIP_CENTURION
        | 1 << tables::SHIP_GALAXY;
    Ok(ctx.secrets & all == all)
}

fn t_artifact(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(has_cargo(ctx, tables::CARGO_ALIEN_ARTIFACT))
}

fn t_plaything(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(has_cargo(ctx, tables::CARGO_PLAYTHING))
}

fn t_millionaire(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(credits(ctx)? >= 1_000_000)
}

fn t_broke(ctx: &EvalContext) -> Result<bool, RuleError> {
    // Being down to nothing only counts once you have somewhere to be.
    Ok(credits(ctx)? == 0 && plot_underway(ctx)?)
}

fn t_pacifist(ctx: &EvalContext) -> Result<bool, RuleError> {
    let past_intro = matches!(super::plot_series_state(ctx)?, Some((s, _)) if s >= 2);
    Ok(past_intro && super::total_kills(ctx)? == 0)
}

fn t_clean_record(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(plot_underway(ctx)?
        && super::kills(ctx, tables::FACTION_MERCHANTS)? == 0
        && super::kills(ctx, tables::FACTION_MILITIA)? == 0
        && super::kills(ctx, tables::FACTION_CONFEDS)? == 0)
}

fn t_steltek_gun(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ctx
        .save
        .guns()
        .iter()
        .any(|&(_, gun)| gun == tables::GUN_BOOSTED_STELTEK))
}

fn t_full_rack(ctx: &EvalContext) -> Result<bool, RuleError> {
    // Every mount the hull has, filled.
    let mounted: Vec<u8> = ctx.save.guns().iter().map(|&(m, _)| m).collect();
    let needed: &[u8] = match ship(ctx)? {
        tables::SHIP_TARSUS => &[2, 3, 5],
        tables::SHIP_ORION => &[2, 3, 5, 7],
        tables::SHIP_CENTURION => &[1, 2, 3, 4, 5, 7],
        tables::SHIP_GALAXY => &[2, 3, 8, 10],
        _ => return Ok(false),
    };
    Ok(needed.iter().all(|m| mounted.contains(m)))
}

const ALL_BASES: &[tables::BaseId] = &[
    tables::BASE_ACHILLES,
    tables::BASE_BASRA,
    tables::BASE_BURTON,
    tables::BASE_DRAKE,
    tables::BASE_EDOM,
    tables::BASE_HECTOR,
    tables::BASE_HELEN,
    tables::BASE_LIVERPOOL,
    tables::BASE_MAGDALINE,
    tables::BASE_MACABEE,
    tables::BASE_NEW_CONSTANTINOPLE,
    tables::BASE_NEW_DETROIT,
    tables::BASE_OAKHAM,
    tables::BASE_OXFORD,
    tables::BASE_PALAN,
    tables::BASE_PERRY,
    tables::BASE_REMUS,
    tables::BASE_RYGANNON,
    tables::BASE_SIVA,
    tables::BASE_SARATOV,
    tables::BASE_SPEKE,
    tables::BASE_TUCKS,
];

static CATEGORIES: &[Category] = &[
    Category {
        name: "Tarsus Grind",
        cheeves: &[
            Achievement {
                id: "tarsus_victor",
                name: "Hundred in a Hauler",
                desc: "Score 100 kills without ever leaving the Tarsus",
                multi: false,
                rule: Rule::Predicate { test: t_tarsus_victor },
            },
            Achievement {
                id: "tarsus_tycoon",
                name: "She May Not Look Like Much",
                desc: "Hold a million credits while still flying the Tarsus",
                multi: false,
                rule: Rule::Predicate { test: t_tarsus_tycoon },
            },
            Achievement {
                id: "tarsus_endgame",
                name: "Stock Everything",
                desc: "Finish the plot in the ship you started with",
                multi: false,
                rule: Rule::Predicate { test: t_tarsus_endgame },
            },
        ],
    },
    Category {
        name: "Plot",
        cheeves: &[
            Achievement {
                id: "plot_started",
                name: "Gainful Employment",
                desc: "Take your first plot mission",
                multi: false,
                rule: Rule::Predicate { test: t_plot_started },
            },
            Achievement {
                id: "plot_oxford",
                name: "Paper Trail",
                desc: "Finish the Oxford research chain",
                multi: false,
                rule: Rule::SeriesCompleted { series: 3 },
            },
            Achievement {
                id: "plot_rygannon",
                name: "Far From Home",
                desc: "Fly the Rygannon surveys",
                multi: false,
                rule: Rule::SeriesCompleted { series: 5 },
            },
            Achievement {
                id: "plot_finished",
                name: "Good Riddance",
                desc: "Destroy the Steltek drone",
                multi: false,
                rule: Rule::PlotFinished,
            },
            Achievement {
                id: "plot_failed",
                name: "You Had One Job",
                desc: "Fail the plot outright",
                multi: false,
                rule: Rule::PlotFailed,
            },
        ],
    },
    Category {
        name: "Ships",
        cheeves: &[
            Achievement {
                id: "own_orion",
                name: "Tough Nut",
                desc: "Fly an Orion",
                multi: false,
                rule: Rule::Predicate { test: t_own_orion },
            },
            Achievement {
                id: "own_centurion",
                name: "Pointy End First",
                desc: "Fly a Centurion",
                multi: false,
                rule: Rule::Predicate { test: t_own_centurion },
            },
            Achievement {
                id: "own_galaxy",
                name: "Room For Cargo",
                desc: "Fly a Galaxy",
                multi: false,
                rule: Rule::Predicate { test: t_own_galaxy },
            },
            Achievement {
                id: "all_secrets",
                name: "False Bottoms",
                desc: "Have the secret compartment fitted in every hull",
                multi: false,
                rule: Rule::Predicate { test: t_all_secrets },
            },
        ],
    },
    Category {
        name: "Random",
        cheeves: &[
            Achievement {
                id: "artifact",
                name: "It Belongs in a Museum",
                desc: "Carry the alien artifact",
                multi: false,
                rule: Rule::Predicate { test: t_artifact },
            },
            Achievement {
                id: "plaything",
                name: "Impulse Purchase",
                desc: "Carry a PlayThing (tm)",
                multi: false,
                rule: Rule::Predicate { test: t_plaything },
            },
            Achievement {
                id: "millionaire",
                name: "Retire Already",
                desc: "Hold a million credits",
                multi: false,
                rule: Rule::Predicate { test: t_millionaire },
            },
            Achievement {
                id: "broke",
                name: "Pocket Lint",
                desc: "Run the balance down to zero credits",
                multi: false,
                rule: Rule::Predicate { test: t_broke },
            },
            Achievement {
                id: "full_rack",
                name: "No Empty Hardpoints",
                desc: "Fill every gun mount on your ship",
                multi: false,
                rule: Rule::Predicate { test: t_full_rack },
            },
        ],
    },
    Category {
        name: "Mostly Peaceful",
        cheeves: &[
            Achievement {
                id: "pacifist",
                name: "Words Not Lasers",
                desc: "Reach the Oxford chain without a single kill",
                multi: false,
                rule: Rule::Predicate { test: t_pacifist },
            },
            Achievement {
                id: "clean_record",
                name: "Model Citizen",
                desc: "No merchant, militia or Confed kills on your record",
                multi: false,
                rule: Rule::Predicate { test: t_clean_record },
            },
        ],
    },
    Category {
        name: "Mass-murder?",
        cheeves: &[
            Achievement {
                id: "retro_crusade",
                name: "Counter-Crusade",
                desc: "Kill 100 Retros",
                multi: false,
                rule: Rule::Kills { faction: tables::FACTION_RETROS, at_least: 100 },
            },
            Achievement {
                id: "kilrathi_ace",
                name: "Hairballs",
                desc: "Kill 100 Kilrathi",
                multi: false,
                rule: Rule::Kills { faction: tables::FACTION_KILRATHI, at_least: 100 },
            },
            Achievement {
                id: "pirate_scourge",
                name: "No Quarter",
                desc: "Kill 100 pirates",
                multi: false,
                rule: Rule::Kills { faction: tables::FACTION_PIRATES, at_least: 100 },
            },
            Achievement {
                id: "outlaw",
                name: "Wanted Poster",
                desc: "Kill 50 militia",
                multi: false,
                rule: Rule::Kills { faction: tables::FACTION_MILITIA, at_least: 50 },
            },
            Achievement {
                id: "body_count",
                name: "Five Hundred",
                desc: "Score 500 kills in total",
                multi: false,
                rule: Rule::TotalKills { at_least: 500 },
            },
        ],
    },
    Category {
        name: "Feats of Insanity",
        cheeves: &[
            Achievement {
                id: "pirate_tour",
                name: "Scum and Villainy",
                desc: "Dock at every pirate base",
                multi: true,
                rule: Rule::VisitKind { kind: BaseKind::Pirate },
            },
            Achievement {
                id: "pleasure_tour",
                name: "Shore Leave",
                desc: "Dock at every pleasure planet",
                multi: true,
                rule: Rule::VisitKind { kind: BaseKind::Pleasure },
            },
            Achievement {
                id: "mining_tour",
                name: "Rockhopper",
                desc: "Dock at every mining base",
                multi: true,
                rule: Rule::VisitKind { kind: BaseKind::Mining },
            },
            Achievement {
                id: "grand_tour",
                name: "Seen It All",
                desc: "Dock at every base in the sector",
                multi: true,
                rule: Rule::VisitAll { bases: ALL_BASES },
            },
            Achievement {
                id: "boosted",
                name: "Glowing Contraband",
                desc: "Mount the boosted Steltek gun",
                multi: false,
                rule: Rule::Predicate { test: t_steltek_gun },
            },
        ],
    },
];

// ---- Righteous Fire additions --------------------------------------------

fn t_rf_fusion(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ctx.save.guns().iter().any(|&(_, gun)| gun == 8))
}

fn t_rf_terrell_credits(ctx: &EvalContext) -> Result<bool, RuleError> {
    Ok(ctx.save.flag(tables::RF_FLAG_TERRELL_CREDITS))
}

static RF_TAYLA_DONE: &[usize] = &[
    tables::RF_FLAG_TAYLA_1_DONE,
    tables::RF_FLAG_TAYLA_2_DONE,
    tables::RF_FLAG_TAYLA_3_DONE,
    tables::RF_FLAG_TAYLA_4_DONE,
];

static RF_MURPHY_DONE: &[usize] = &[
    tables::RF_FLAG_MURPHY_1_DONE,
    tables::RF_FLAG_MURPHY_2_DONE,
    tables::RF_FLAG_MURPHY_3_DONE,
    tables::RF_FLAG_MURPHY_4_DONE,
];

static RF_MASTERSON_DONE: &[usize] = &[
    tables::RF_FLAG_MASTERSON_1_DONE,
    tables::RF_FLAG_MASTERSON_1_DONE + 1,
    tables::RF_FLAG_MASTERSON_3_DONE,
    tables::RF_FLAG_MASTERSON_3_DONE + 1,
    tables::RF_FLAG_MASTERSON_5_DONE,
];

static RF_MONTE_DONE: &[usize] = &[
    tables::RF_FLAG_MONTE_1_DONE,
    tables::RF_FLAG_MONTE_2A_DONE,
    tables::RF_FLAG_MONTE_2B_DONE,
    tables::RF_FLAG_MONTE_3_DONE,
];

static RF_CATEGORIES: &[Category] = &[
    Category {
        name: "Plot",
        cheeves: &[
            Achievement {
                id: "rf_tayla",
                name: "Repeat Customer",
                desc: "Fly every Tayla mission",
                multi: false,
                rule: Rule::FlagsAll { flags: RF_TAYLA_DONE },
            },
            Achievement {
                id: "rf_murphy",
                name: "Bounty Hunter's Hunter",
                desc: "Fly every Murphy mission",
                multi: false,
                rule: Rule::FlagsAll { flags: RF_MURPHY_DONE },
            },
            Achievement {
                id: "rf_masterson",
                name: "By the Book",
                desc: "Fly every Masterson mission",
                multi: false,
                rule: Rule::FlagsAll { flags: RF_MASTERSON_DONE },
            },
            Achievement {
                id: "rf_monte",
                name: "Friends in Low Places",
                desc: "Fly every Monte mission",
                multi: false,
                rule: Rule::FlagsAll { flags: RF_MONTE_DONE },
            },
            Achievement {
                id: "rf_gaea",
                name: "Paradise Found",
                desc: "Make the trip to Gaea",
                multi: false,
                rule: Rule::FlagsAll { flags: &[tables::RF_FLAG_GAEA_DONE] },
            },
            Achievement {
                id: "rf_jones",
                name: "Cult Deprogrammer",
                desc: "Put an end to Mordecai Jones",
                multi: false,
                rule: Rule::FlagsAll { flags: &[tables::RF_FLAG_JONES_DONE] },
            },
        ],
    },
    Category {
        name: "Random",
        cheeves: &[
            Achievement {
                id: "rf_fusion",
                name: "Sun in a Bottle",
                desc: "Mount a fusion cannon",
                multi: false,
                rule: Rule::Predicate { test: t_rf_fusion },
            },
            Achievement {
                id: "rf_terrell_credits",
                name: "Creative Accounting",
                desc: "Catch Terrell in credits mode",
                multi: false,
                rule: Rule::Predicate { test: t_rf_terrell_credits },
            },
        ],
    },
];

pub fn categories() -> &'static [Category] {
    CATEGORIES
}

pub fn rf_categories() -> &'static [Category] {
    RF_CATEGORIES
}
