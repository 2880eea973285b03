//! Plain-text drawing of the controller's screen.

use std::fmt::Write;

use mitai_core::controller::SearchForm;
use mitai_core::view::{
    DetailsModal, Pager, PlayerOverlay, ResultsArea, Screen, TrailerView, View,
    PLACEHOLDER_META, PLACEHOLDER_TITLE, NO_TRAILER,
};

const RULE: &str = "────────────────────────────────────────────────────────────";

pub fn render(screen: &Screen, form: &SearchForm) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = draw(&mut out, screen, form);
    out
}

fn draw(out: &mut String, screen: &Screen, form: &SearchForm) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    let (home, watchlist) = match screen.view {
        View::Home => ("[Home]", "Watchlist"),
        View::Watchlist => ("Home", "[Watchlist]"),
    };
    writeln!(
        out,
        " mitai  {home}  {watchlist}    search: \"{}\"  season: {}  format: {}",
        form.query,
        form.season.map_or_else(|| "any".to_string(), |s| s.to_string()),
        form.format.map_or_else(|| "any".to_string(), |f| f.to_string()),
    )?;
    writeln!(out, "{RULE}")?;

    draw_results(out, &screen.results)?;
    draw_pager(out, &screen.pager)?;

    if let Some(details) = &screen.details {
        draw_details(out, details)?;
    }
    if let Some(player) = &screen.player {
        draw_player(out, player)?;
    }
    Ok(())
}

fn draw_results(out: &mut String, results: &ResultsArea) -> std::fmt::Result {
    match results {
        ResultsArea::Empty => {}
        ResultsArea::Placeholders(n) => {
            for _ in 0..*n {
                writeln!(out, "  {PLACEHOLDER_TITLE}  {PLACEHOLDER_META}")?;
            }
        }
        ResultsArea::Cards(cards) => {
            for (i, card) in cards.iter().enumerate() {
                writeln!(out, "{:>3}. {}  (#{})", i + 1, card.title, card.id)?;
                if !card.meta.is_empty() {
                    writeln!(out, "     {}", card.meta)?;
                }
                if !card.genres.is_empty() {
                    writeln!(out, "     {}", card.genres)?;
                }
                if !card.cover_url.is_empty() {
                    writeln!(out, "     cover: {}", card.cover_url)?;
                }
            }
            if !cards.is_empty() {
                writeln!(out, "     (details <n> · add <n> · watch <n>)")?;
            }
        }
        ResultsArea::Watchlist(cards) => {
            for card in cards {
                writeln!(out, "  #{:<8} {}", card.id, card.title)?;
                writeln!(out, "            {}", card.catalog_url)?;
            }
            writeln!(out, "     (remove <id> · open <id>)")?;
        }
        ResultsArea::Notice(text) => writeln!(out, "  {text}")?,
    }
    Ok(())
}

fn draw_pager(out: &mut String, pager: &Pager) -> std::fmt::Result {
    let prev = if pager.prev_enabled { "‹ prev" } else { "      " };
    let next = if pager.next_enabled { "next ›" } else { "      " };
    writeln!(out, "{RULE}")?;
    writeln!(out, " {prev}   {}   {next}", pager.label)?;
    writeln!(out, "{RULE}")
}

fn draw_details(out: &mut String, details: &DetailsModal) -> std::fmt::Result {
    writeln!(out, "┌─ {}", details.title)?;
    if !details.cover_url.is_empty() {
        writeln!(out, "│ cover: {}", details.cover_url)?;
    }
    if !details.badges.is_empty() {
        writeln!(out, "│ {}", details.badges.join(" | "))?;
    }
    if !details.genres.is_empty() {
        writeln!(out, "│ {}", details.genres.join(", "))?;
    }
    writeln!(out, "│")?;
    for line in details.description.lines() {
        writeln!(out, "│ {line}")?;
    }
    writeln!(out, "│")?;
    match &details.trailer {
        TrailerView::Embed(url) => writeln!(out, "│ trailer: {url}")?,
        TrailerView::Unavailable => writeln!(out, "│ {NO_TRAILER}")?,
    }
    if let Some(url) = &details.site_url {
        writeln!(out, "│ AniList: {url}")?;
    }
    writeln!(out, "│ where to watch: {}", details.where_to_watch)?;
    writeln!(out, "└─ (add · watch · page · player · close)")
}

fn draw_player(out: &mut String, player: &PlayerOverlay) -> std::fmt::Result {
    writeln!(out, "┌─ {}", player.title)?;
    writeln!(out, "│ Playback is only available for streams you hold the rights to.")?;
    writeln!(out, "└─ (close)")
}
