use crate::savedata::GameVariant;

// Id-to-name tables. These are the single source of truth for the codec's
// symbolic layer: the renderer prints through them, the field accessor
// resolves symbolic values against them, and the achievement rules compare
// against the id constants.

pub type BaseId = u8;

// Ships, by the id byte at the start of the SHIP chunk.
pub const SHIP_TARSUS: u8 = 0;
pub const SHIP_ORION: u8 = 1;
pub const SHIP_CENTURION: u8 = 2;
pub const SHIP_GALAXY: u8 = 3;

pub const SHIPS: &[(u8, &str)] = &[
    (SHIP_TARSUS, "Tarsus"),
    (SHIP_ORION, "Orion"),
    (SHIP_CENTURION, "Centurion"),
    (SHIP_GALAXY, "Galaxy"),
];

// Factions, in KILL/ORIG record slot order (one i16 per faction).
pub const FACTION_MERCHANTS: usize = 0;
pub const FACTION_HUNTERS: usize = 1;
pub const FACTION_CONFEDS: usize = 2;
pub const FACTION_KILRATHI: usize = 3;
pub const FACTION_MILITIA: usize = 4;
pub const FACTION_PIRATES: usize = 5;
pub const FACTION_DRONE: usize = 6;
pub const FACTION_RETROS: usize = 7;

pub const FACTIONS: &[&str] = &[
    "Merchants", "Hunters", "Confeds", "Kilrathi", "Militia", "Pirates", "Drone", "Retros",
];

// Gun ids as stored in GUNS record pairs. The expansion reuses slot 8.
pub const GUN_STELTEK: u8 = 8;
pub const GUN_BOOSTED_STELTEK: u8 = 9;

pub const GUNS: &[(u8, &str)] = &[
    (0, "Neutron gun"),
    (1, "Meson blaster"),
    (2, "Ionic pulse cannon"),
    (3, "Mass driver"),
    (4, "Particle cannon"),
    (5, "Laser"),
    (6, "Plasma gun"),
    (7, "Tachyon cannon"),
];

pub const GUNS_PRIV: &[(u8, &str)] = &[
    (GUN_STELTEK, "Steltek gun"),
    (GUN_BOOSTED_STELTEK, "Boosted Steltek gun"),
];

pub const GUNS_RF: &[(u8, &str)] = &[(8, "Fusion cannon")];

pub const GUN_MOUNTS: &[(u8, &str)] = &[
    (1, "Left outer"),
    (2, "Left"),
    (3, "Right"),
    (4, "Right outer"),
    (5, "Rear/Top 2"),
    (7, "Rear/Top 1"),
    (8, "Bottom 2"),
    (10, "Bottom 1"),
];

pub const MISSILES: &[(u8, &str)] = &[
    (1, "Torpedo"),
    (2, "Heat seeker"),
    (3, "Friend or foe"),
    (4, "Dumb fire"),
    (5, "Image recognition"),
];

// LNCH record entries.
pub const LAUNCHER_MISSILE: u8 = 50;
pub const LAUNCHER_TORPEDO: u8 = 51;
pub const LAUNCHER_TRACTOR: u8 = 52;

pub const LAUNCHERS: &[(u8, &str)] = &[
    (LAUNCHER_MISSILE, "Missile launcher"),
    (LAUNCHER_TORPEDO, "Torpedo launcher"),
    (LAUNCHER_TRACTOR, "Tractor beam"),
];

pub const TURRETS: &[(u8, &str)] = &[(1, "Rear turret"), (2, "Top turret"), (3, "Bottom turret")];

pub const CARGO_PLAYTHING: u8 = 27;
pub const CARGO_ALIEN_ARTIFACT: u8 = 42;
pub const CARGO_MISSION: u8 = 49;

pub const CARGO: &[(u8, &str)] = &[
    (0, "Grain"),
    (1, "Generic Foods"),
    (2, "Luxury Foods"),
    (3, "Wood"),
    (4, "Plastics"),
    (5, "Iron"),
    (6, "Tungsten"),
    (9, "Food Dispensers"),
    (10, "Home Appliances"),
    (11, "Pre-Fabs"),
    (13, "Communications"),
    (15, "Construction"),
    (16, "Factory Equipment"),
    (17, "Space Salvage"),
    (18, "Robot Workers"),
    (24, "Furs"),
    (25, "Liquor"),
    (CARGO_PLAYTHING, "PlayThing (tm)"),
    (33, "Pets"),
    (34, "Tobacco"),
    (35, "Ultimate"),
    (CARGO_ALIEN_ARTIFACT, "Alien Artifact(s)"),
    (CARGO_MISSION, "Mission Cargo"),
];

// Shield level is stored biased in SHLD/INFO byte 8.
pub const SHIELD_BASE: u8 = 89;
// Scanner id is stored biased in TRGT/INFO byte 8, right after the
// unterminated "TARGETNG" tag.
pub const SCANNER_BASE: u8 = 60;

// The grid position doubles as the capability matrix: id/3 is colour depth,
// id%3 is lock level.
pub const SCANNERS: &[(u8, &str)] = &[
    (0, "Iris Mk I"),
    (1, "Iris Mk II"),
    (2, "Iris Mk III"),
    (3, "Hunter AW 6"),
    (4, "Hunter AW 6i"),
    (5, "Hunter AW Infinity"),
    (6, "BS Tripwire"),
    (7, "B.S. E.Y.E"),
    (8, "B.S. Omni"),
];

// NAVQ quadrant map bits.
pub const QUAD_HUMBOLDT: u8 = 0;
pub const QUAD_FARISS: u8 = 1;
pub const QUAD_POTTER: u8 = 2;
pub const QUAD_CLARKE: u8 = 3;

pub const QUADRANTS: &[(u8, &str)] = &[
    (QUAD_HUMBOLDT, "Humboldt"),
    (QUAD_FARISS, "Fariss"),
    (QUAD_POTTER, "Potter"),
    (QUAD_CLARKE, "Clarke"),
];

// REPR record leads with an i16 droid id.
pub const REPAIR_DROIDS: &[(i16, &str)] = &[(400, "Repair Droid"), (200, "Advanced Droid")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    Mining,
    Agricultural,
    Refinery,
    Pirate,
    Pleasure,
    Special,
}

pub struct Base {
    pub id: BaseId,
    pub name: &'static str,
    pub system: &'static str,
    pub kind: BaseKind,
}

// Base ids referenced by the plot and the achievement rules.
pub const BASE_ACHILLES: BaseId = 0;
pub const BASE_BASRA: BaseId = 5;
pub const BASE_BURTON: BaseId = 7;
pub const BASE_DRAKE: BaseId = 12;
pub const BASE_EDOM: BaseId = 13;
pub const BASE_HECTOR: BaseId = 15;
pub const BASE_HELEN: BaseId = 17;
pub const BASE_LIVERPOOL: BaseId = 23;
pub const BASE_MAGDALINE: BaseId = 24;
pub const BASE_MACABEE: BaseId = 25;
pub const BASE_NEW_CONSTANTINOPLE: BaseId = 31;
pub const BASE_NEW_DETROIT: BaseId = 33;
pub const BASE_OAKHAM: BaseId = 36;
pub const BASE_OXFORD: BaseId = 38;
pub const BASE_PALAN: BaseId = 39;
pub const BASE_PERRY: BaseId = 40;
pub const BASE_REMUS: BaseId = 41;
pub const BASE_RYGANNON: BaseId = 43;
pub const BASE_SIVA: BaseId = 44;
pub const BASE_SARATOV: BaseId = 45;
pub const BASE_SPEKE: BaseId = 46;
pub const BASE_TUCKS: BaseId = 50;
/// The expansion reuses the derelict's slot for Gaea.
pub const BASE_DERELICT: BaseId = 59;
pub const BASE_GAEA: BaseId = BASE_DERELICT;

pub const BASES: &[Base] = &[
    Base { id: BASE_ACHILLES, name: "Achilles", system: "Troy", kind: BaseKind::Mining },
    Base { id: BASE_BASRA, name: "Basra", system: "Hind's Variance", kind: BaseKind::Refinery },
    Base { id: BASE_BURTON, name: "Burton", system: "Ragozin", kind: BaseKind::Pleasure },
    Base { id: BASE_DRAKE, name: "Drake", system: "Capella", kind: BaseKind::Mining },
    Base { id: BASE_EDOM, name: "Edom", system: "New Gaza", kind: BaseKind::Refinery },
    Base { id: BASE_HECTOR, name: "Hector", system: "Troy", kind: BaseKind::Mining },
    Base { id: BASE_HELEN, name: "Helen", system: "Troy", kind: BaseKind::Agricultural },
    Base { id: BASE_LIVERPOOL, name: "Liverpool", system: "Liverpool", kind: BaseKind::Refinery },
    Base { id: BASE_MAGDALINE, name: "Magdaline", system: "Padre", kind: BaseKind::Pleasure },
    Base { id: BASE_MACABEE, name: "Macabee", system: "Auriga", kind: BaseKind::Mining },
    Base {
        id: BASE_NEW_CONSTANTINOPLE,
        name: "New Constantinople",
        system: "New Constantinople",
        kind: BaseKind::Special,
    },
    Base { id: BASE_NEW_DETROIT, name: "New Detroit", system: "New Detroit", kind: BaseKind::Special },
    Base { id: BASE_OAKHAM, name: "Oakham", system: "Pentonville", kind: BaseKind::Pirate },
    Base { id: BASE_OXFORD, name: "Oxford", system: "Oxford", kind: BaseKind::Special },
    Base { id: BASE_PALAN, name: "Palan", system: "Palan", kind: BaseKind::Special },
    Base { id: BASE_PERRY, name: "Perry Naval Base", system: "Perry", kind: BaseKind::Special },
    Base { id: BASE_REMUS, name: "Remus", system: "Auriga", kind: BaseKind::Agricultural },
    Base { id: BASE_RYGANNON, name: "Rygannon", system: "Rygannon", kind: BaseKind::Special },
    Base { id: BASE_SIVA, name: "Siva", system: "Delta Prime", kind: BaseKind::Refinery },
    Base { id: BASE_SARATOV, name: "Saratov", system: "Surilus", kind: BaseKind::Mining },
    Base { id: BASE_SPEKE, name: "Speke", system: "Farris", kind: BaseKind::Agricultural },
    Base { id: BASE_TUCKS, name: "Tuck's", system: "Pender's Star", kind: BaseKind::Pirate },
    Base { id: BASE_DERELICT, name: "Derelict base", system: "unknown", kind: BaseKind::Special },
];

pub fn base_name(game: GameVariant, id: BaseId) -> Option<String> {
    if id == BASE_GAEA && game == GameVariant::RighteousFire {
        return Some("Gaea".to_string());
    }
    BASES
        .iter()
        .find(|b| b.id == id)
        .map(|b| format!("{} ({})", b.name, b.system))
}

pub fn bases_of_kind(kind: BaseKind) -> impl Iterator<Item = &'static Base> {
    BASES.iter().filter(move |b| b.kind == kind)
}

pub fn lookup(table: &[(u8, &'static str)], id: u8) -> Option<&'static str> {
    table.iter().find(|&&(k, _)| k == id).map(|&(_, v)| v)
}

/// Gun table for one game: the common eight plus the game-specific slots.
pub fn gun_name(game: GameVariant, id: u8) -> Option<&'static str> {
    lookup(GUNS, id).or_else(|| match game {
        GameVariant::Privateer => lookup(GUNS_PRIV, id),
        GameVariant::RighteousFire => lookup(GUNS_RF, id),
    })
}

// ---- mission flag tables --------------------------------------------------
//
// The FLAGS chunk holds one byte per flag. The base game uses a short table;
// the expansion packs its fixer chains into three bands: offered at 1..=24,
// accepted at offered+24, and done from 151.

pub const RF_OFFERED_TO_ACCEPTED: usize = 24;
pub const RF_DONE_BASE: usize = 151;

pub const RF_FLAG_TAYLA_1_OFFERED: usize = 1;
pub const RF_FLAG_MURPHY_1_OFFERED: usize = 5;
pub const RF_FLAG_GOODIN_1_OFFERED: usize = 9;
pub const RF_FLAG_MASTERSON_1_OFFERED: usize = 13;
pub const RF_FLAG_MONTE_1_OFFERED: usize = 18;
pub const RF_FLAG_GOODIN_5_OFFERED: usize = 22;
pub const RF_FLAG_TERRELL_OFFERED: usize = 23;
pub const RF_FLAG_GAEA_OFFERED: usize = 24;

pub const RF_FLAG_LYNCH_INTRODUCED: usize = 49;
pub const RF_FLAG_TAYLA_GONE: usize = 51;
pub const RF_FLAG_MURPHY_BOUNTY_PAID: usize = 52;
pub const RF_FLAG_GOODIN_BOUNTY_OFFERED: usize = 53;
pub const RF_FLAG_MONTE_UNLOCKED: usize = 54;
pub const RF_FLAG_MONTE_GONE: usize = 55;
pub const RF_FLAG_INFORMANT_GONE: usize = 57;
pub const RF_FLAG_TERRELL_CREDITS: usize = 58;

pub const RF_FLAG_TAYLA_1_DONE: usize = 151;
pub const RF_FLAG_TAYLA_2_DONE: usize = 152;
pub const RF_FLAG_TAYLA_3_DONE: usize = 153;
pub const RF_FLAG_TAYLA_4_DONE: usize = 154;
pub const RF_FLAG_MURPHY_1_DONE: usize = 155;
pub const RF_FLAG_MURPHY_2_DONE: usize = 156;
pub const RF_FLAG_MURPHY_3_DONE: usize = 157;
pub const RF_FLAG_MURPHY_4_DONE: usize = 158;
pub const RF_FLAG_GOODIN_1_DONE: usize = 159;
pub const RF_FLAG_GOODIN_4_DONE: usize = 162;
pub const RF_FLAG_MASTERSON_1_DONE: usize = 163;
pub const RF_FLAG_MASTERSON_3_DONE: usize = 165;
pub const RF_FLAG_MASTERSON_5_DONE: usize = 167;
pub const RF_FLAG_MONTE_1_DONE: usize = 168;
pub const RF_FLAG_MONTE_2A_DONE: usize = 169;
pub const RF_FLAG_MONTE_2B_DONE: usize = 170;
pub const RF_FLAG_MONTE_3_DONE: usize = 171;
pub const RF_FLAG_LYNCH_RESET_UNAVAILABLE: usize = 172;
pub const RF_FLAG_GOODIN_5_DONE: usize = 173;
pub const RF_FLAG_TERRELL_DONE: usize = 174;
pub const RF_FLAG_GAEA_DONE: usize = 175;
pub const RF_FLAG_JONES_DONE: usize = 176;

const RF_CHAINS: &[(&str, usize, usize, usize)] = &[
    // name, count, first offered flag, first done flag
    ("Tayla", 4, RF_FLAG_TAYLA_1_OFFERED, RF_FLAG_TAYLA_1_DONE),
    ("Murphy", 4, RF_FLAG_MURPHY_1_OFFERED, RF_FLAG_MURPHY_1_DONE),
    ("Goodin", 4, RF_FLAG_GOODIN_1_OFFERED, RF_FLAG_GOODIN_1_DONE),
    ("Masterson", 5, RF_FLAG_MASTERSON_1_OFFERED, RF_FLAG_MASTERSON_1_DONE),
    ("Monte", 4, RF_FLAG_MONTE_1_OFFERED, RF_FLAG_MONTE_1_DONE),
    ("Goodin 5", 1, RF_FLAG_GOODIN_5_OFFERED, RF_FLAG_GOODIN_5_DONE),
    ("Terrell", 1, RF_FLAG_TERRELL_OFFERED, RF_FLAG_TERRELL_DONE),
    ("Go to Gaea", 1, RF_FLAG_GAEA_OFFERED, RF_FLAG_GAEA_DONE),
];

const RF_MISC: &[(usize, &str)] = &[
    (RF_FLAG_LYNCH_INTRODUCED, "Roman Lynch introduced"),
    (RF_FLAG_TAYLA_GONE, "Tayla gone"),
    (RF_FLAG_MURPHY_BOUNTY_PAID, "Murphy bounty paid"),
    (RF_FLAG_GOODIN_BOUNTY_OFFERED, "Goodin bounty offered"),
    (RF_FLAG_MONTE_UNLOCKED, "Monte unlocked"),
    (RF_FLAG_MONTE_GONE, "Monte gone"),
    (RF_FLAG_INFORMANT_GONE, "Informant gone"),
    (RF_FLAG_TERRELL_CREDITS, "Terrell in credits mode"),
    (RF_FLAG_LYNCH_RESET_UNAVAILABLE, "Lynch free reset unavailable"),
    (RF_FLAG_JONES_DONE, "Killed Jones"),
];

const PRIV_FLAGS: &[(usize, &str)] = &[
    (1, "Sandoval introduced"),
    (2, "Tayla introduced"),
    (3, "Roman Lynch introduced"),
    (4, "Oxford library open"),
    (5, "Masterson introduced"),
    (6, "Taryn Cross introduced"),
];

/// Name for a mission flag, or None for slots with no known meaning.
pub fn flag_name(game: GameVariant, n: usize) -> Option<String> {
    match game {
        GameVariant::Privateer => PRIV_FLAGS
            .iter()
            .find(|&&(id, _)| id == n)
            .map(|&(_, name)| name.to_string()),
        GameVariant::RighteousFire => {
            if let Some(&(_, name)) = RF_MISC.iter().find(|&&(id, _)| id == n) {
                return Some(name.to_string());
            }
            for &(chain, count, offered, done) in RF_CHAINS {
                for i in 0..count {
                    let label = |state: &str| {
                        if count == 1 {
                            format!("{chain} {state}")
                        } else {
                            format!("{chain} {} {state}", i + 1)
                        }
                    };
                    if n == offered + i {
                        return Some(label("offered"));
                    }
                    if n == offered + i + RF_OFFERED_TO_ACCEPTED {
                        return Some(label("accepted"));
                    }
                    if n == done + i {
                        return Some(label("done"));
                    }
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rf_chain_flags_have_names() {
        let g = GameVariant::RighteousFire;
        assert_eq!(flag_name(g, RF_FLAG_TAYLA_1_OFFERED).as_deref(), Some("Tayla 1 offered"));
        assert_eq!(
            flag_name(g, RF_FLAG_TAYLA_1_OFFERED + RF_OFFERED_TO_ACCEPTED).as_deref(),
            Some("Tayla 1 accepted")
        );
        assert_eq!(flag_name(g, RF_FLAG_MASTERSON_5_DONE).as_deref(), Some("Masterson 5 done"));
        assert_eq!(flag_name(g, RF_FLAG_GAEA_DONE).as_deref(), Some("Go to Gaea done"));
        assert_eq!(flag_name(g, 100), None);
    }

    #[test]
    fn gaea_name_is_game_aware() {
        assert_eq!(
            base_name(GameVariant::Privateer, BASE_DERELICT).as_deref(),
            Some("Derelict base (unknown)")
        );
        assert_eq!(base_name(GameVariant::RighteousFire, BASE_GAEA).as_deref(), Some("Gaea"));
    }
}
