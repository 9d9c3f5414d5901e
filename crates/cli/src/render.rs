//! Plain-text tables.

use std::io::{self, Write};

use posleep_client::{IngredientBoard, Notice, RecipeBoard};
use posleep_core::icons::ingredient_icon;
use posleep_core::projection::Summary;
use posleep_core::{PotSetting, Recipe, RecipeAvailability, RecipeSlot, effective_capacity};

fn mark(flag: bool) -> &'static str {
    if flag { "*" } else { "-" }
}

/// Write a banner: success to stdout, errors to stderr.
pub fn notice(notice: &Notice) -> io::Result<()> {
    if notice.is_error() {
        writeln!(io::stderr().lock(), "{notice}")
    } else {
        writeln!(io::stdout().lock(), "{notice}")
    }
}

fn summary(out: &mut impl Write, summary: &Summary, with_target: bool) -> io::Result<()> {
    if with_target {
        writeln!(
            out,
            "total {} / registered {} / target {} / shown {}",
            summary.total, summary.registered, summary.target, summary.visible
        )
    } else {
        writeln!(
            out,
            "total {} / registered {} / shown {}",
            summary.total, summary.registered, summary.visible
        )
    }
}

pub fn ingredients(out: &mut impl Write, board: &IngredientBoard) -> io::Result<()> {
    summary(out, &board.summary(), false)?;
    writeln!(
        out,
        "{:>5}  {:<16} {:<3} {:>8} {:>8}  name",
        "id", "icon", "reg", "quantity", "target"
    )?;
    for row in board.view() {
        writeln!(
            out,
            "{:>5}  {:<16} {:<3} {:>8} {:>8}  {}",
            row.id.as_i32(),
            ingredient_icon(&row.name),
            mark(row.is_registered),
            row.quantity,
            row.target_quantity,
            row.name
        )?;
    }
    Ok(())
}

pub fn pot(out: &mut impl Write, pot: &PotSetting) -> io::Result<()> {
    writeln!(
        out,
        "capacity {} (effective {}), camping {}, category {}",
        pot.capacity,
        effective_capacity(Some(pot.capacity), pot.is_camping),
        if pot.is_camping { "on" } else { "off" },
        pot.category_or_all()
    )
}

fn slot(slot: &RecipeSlot, availability: &str) -> String {
    match (&slot.ingredient_name, slot.is_used()) {
        (Some(name), true) => format!(
            "{name} {}/{} [{availability}]",
            slot.need.unwrap_or(0),
            slot.req.unwrap_or(0)
        ),
        _ => String::new(),
    }
}

fn recipe_line(recipe: &Recipe, availability: &RecipeAvailability) -> String {
    let slots: Vec<String> = recipe
        .slots
        .iter()
        .zip(availability.slot_severity)
        .map(|(s, severity)| slot(s, severity.token()))
        .filter(|s| !s.is_empty())
        .collect();
    format!(
        "{:>5}  {:<3} {:<3} {:>5} {:<8} {:<4} {:<14} {}  |  {}",
        recipe.id.as_i32(),
        mark(recipe.is_target),
        mark(recipe.is_registered),
        recipe.total_quantity,
        availability.capacity.token(),
        if availability.cookable { "ok" } else { "-" },
        recipe.category_or_empty(),
        recipe.name,
        slots.join(", ")
    )
}

pub fn recipes(out: &mut impl Write, board: &RecipeBoard) -> io::Result<()> {
    pot(out, board.pot())?;
    summary(out, &board.summary(), true)?;
    writeln!(
        out,
        "{:>5}  {:<3} {:<3} {:>5} {:<8} {:<4} {:<14} name  |  need/short",
        "id", "tgt", "reg", "total", "capacity", "cook", "category"
    )?;
    for row in board.view() {
        writeln!(out, "{}", recipe_line(row, &board.availability(row)))?;
    }
    Ok(())
}
