//! Formation templates keyed by squad size.
//!
//! Templates are listed line by line from the own goal outward. Within a line,
//! players are spread evenly across the width (left touchline first).
//! Y values sit inside the classifier zone of the line's role.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::role::TacticalRole;
use crate::field::NormalizedPos;

pub const MIN_SQUAD_SIZE: usize = 5;
pub const MAX_SQUAD_SIZE: usize = 11;

const GK_Y: f32 = 95.0;
const DEF_Y: f32 = 78.0;
const DM_Y: f32 = 60.0;
const MID_Y: f32 = 48.0;
const AM_Y: f32 = 32.0;
const ATT_Y: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormationSlot {
    pub role: TacticalRole,
    pub x: f32,
    pub y: f32,
}

impl FormationSlot {
    pub const fn new(role: TacticalRole, x: f32, y: f32) -> Self {
        Self { role, x, y }
    }

    pub fn position(&self) -> NormalizedPos {
        NormalizedPos::new(self.x, self.y)
    }
}

/// Named, ordered list of tactical slots for one squad size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormationTemplate {
    name: String,
    squad_size: usize,
    slots: Vec<FormationSlot>,
}

impl FormationTemplate {
    pub fn new(name: impl Into<String>, squad_size: usize, slots: Vec<FormationSlot>) -> Self {
        Self { name: name.into(), squad_size, slots }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Squad size this template targets.
    pub fn squad_size(&self) -> usize {
        self.squad_size
    }

    pub fn slots(&self) -> &[FormationSlot] {
        &self.slots
    }

    /// Slot count matches the declared target size.
    pub fn is_well_formed(&self) -> bool {
        self.slots.len() == self.squad_size
    }

    /// Whether this template can be applied to a squad of `player_count`.
    pub fn verify_for(&self, player_count: usize) -> bool {
        self.is_well_formed() && self.slots.len() == player_count
    }

    pub fn count_role(&self, role: TacticalRole) -> usize {
        self.slots.iter().filter(|slot| slot.role == role).count()
    }
}

#[derive(Debug, Clone, Copy)]
struct Line {
    role: TacticalRole,
    y: f32,
    count: usize,
}

const fn line(role: TacticalRole, y: f32, count: usize) -> Line {
    Line { role, y, count }
}

const fn gk() -> Line {
    line(TacticalRole::Goalkeeper, GK_Y, 1)
}

const fn def(count: usize) -> Line {
    line(TacticalRole::Defender, DEF_Y, count)
}

const fn dm(count: usize) -> Line {
    line(TacticalRole::Midfielder, DM_Y, count)
}

const fn mid(count: usize) -> Line {
    line(TacticalRole::Midfielder, MID_Y, count)
}

const fn am(count: usize) -> Line {
    line(TacticalRole::Midfielder, AM_Y, count)
}

const fn att(count: usize) -> Line {
    line(TacticalRole::Attacker, ATT_Y, count)
}

struct TemplateSpec {
    name: &'static str,
    lines: Vec<Line>,
}

fn spec(name: &'static str, lines: Vec<Line>) -> TemplateSpec {
    TemplateSpec { name, lines }
}

// Names count the goalkeeper as the first line.
fn tables() -> Vec<(usize, Vec<TemplateSpec>)> {
    vec![
        (5, vec![
            spec("1-2-2", vec![gk(), def(2), att(2)]),
            spec("1-1-2-1", vec![gk(), def(1), mid(2), att(1)]),
            spec("1-2-1-1", vec![gk(), def(2), mid(1), att(1)]),
        ]),
        (6, vec![
            spec("1-4-1", vec![gk(), mid(4), att(1)]),
            spec("1-2-2-1", vec![gk(), def(2), mid(2), att(1)]),
            spec("1-3-2", vec![gk(), def(3), att(2)]),
        ]),
        (7, vec![
            spec("1-3-2-1", vec![gk(), def(3), mid(2), att(1)]),
            spec("1-2-3-1", vec![gk(), def(2), mid(3), att(1)]),
            spec("1-3-1-2", vec![gk(), def(3), mid(1), att(2)]),
        ]),
        (8, vec![
            spec("1-3-3-1", vec![gk(), def(3), mid(3), att(1)]),
            spec("1-3-2-2", vec![gk(), def(3), mid(2), att(2)]),
            spec("1-2-3-2", vec![gk(), def(2), mid(3), att(2)]),
        ]),
        (9, vec![
            spec("1-3-3-2", vec![gk(), def(3), mid(3), att(2)]),
            spec("1-4-3-1", vec![gk(), def(4), mid(3), att(1)]),
            spec("1-3-4-1", vec![gk(), def(3), mid(4), att(1)]),
        ]),
        (10, vec![
            spec("1-4-3-2", vec![gk(), def(4), mid(3), att(2)]),
            spec("1-4-4-1", vec![gk(), def(4), mid(4), att(1)]),
            spec("1-3-4-2", vec![gk(), def(3), mid(4), att(2)]),
        ]),
        (11, vec![
            spec("1-4-4-2", vec![gk(), def(4), mid(4), att(2)]),
            spec("1-4-3-3", vec![gk(), def(4), mid(3), att(3)]),
            spec("1-3-5-2", vec![gk(), def(3), mid(5), att(2)]),
            spec("1-4-2-3-1", vec![gk(), def(4), dm(2), am(3), att(1)]),
        ]),
    ]
}

/// Even spread across the width: one player sits at 50, two at 33.3/66.7, and so on.
fn spread(count: usize) -> impl Iterator<Item = f32> {
    (0..count).map(move |i| 100.0 * (i + 1) as f32 / (count + 1) as f32)
}

fn build_template(squad_size: usize, spec: &TemplateSpec) -> FormationTemplate {
    let slots = spec
        .lines
        .iter()
        .flat_map(|line| spread(line.count).map(move |x| FormationSlot::new(line.role, x, line.y)))
        .collect();
    FormationTemplate::new(spec.name, squad_size, slots)
}

static CATALOG: Lazy<FormationCatalog> = Lazy::new(FormationCatalog::canonical);

/// Static lookup of formation templates keyed by squad size.
#[derive(Debug, Clone)]
pub struct FormationCatalog {
    by_size: BTreeMap<usize, Vec<FormationTemplate>>,
}

impl FormationCatalog {
    /// Shared canonical catalog.
    pub fn global() -> &'static FormationCatalog {
        &CATALOG
    }

    fn canonical() -> Self {
        let by_size = tables()
            .into_iter()
            .map(|(size, specs)| {
                let templates: Vec<FormationTemplate> =
                    specs.iter().map(|spec| build_template(size, spec)).collect();
                for template in templates.iter().filter(|t| !t.is_well_formed()) {
                    tracing::warn!(
                        name = template.name(),
                        expected = size,
                        found = template.slots().len(),
                        "formation table is malformed"
                    );
                }
                (size, templates)
            })
            .collect();
        Self { by_size }
    }

    /// Templates targeting `squad_size`, in display order. Empty for unsupported sizes.
    pub fn suggestions(&self, squad_size: usize) -> &[FormationTemplate] {
        self.by_size.get(&squad_size).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, squad_size: usize, name: &str) -> Option<&FormationTemplate> {
        self.suggestions(squad_size).iter().find(|template| template.name() == name)
    }

    pub fn supported_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_size.keys().copied()
    }

    pub fn all(&self) -> impl Iterator<Item = &FormationTemplate> {
        self.by_size.values().flatten()
    }
}

/// Templates for `squad_size` from the canonical catalog.
pub fn suggestions(squad_size: usize) -> &'static [FormationTemplate] {
    FormationCatalog::global().suggestions(squad_size)
}
