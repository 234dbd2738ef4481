use super::App;
use crate::game::Game;
use crate::keyboard::{finger_for, is_home_row, split_row, LAYOUT, ROW_OFFSETS};
use crate::levels::Level;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{style, Color, Print, PrintStyledContent, StyledContent, Stylize},
    terminal::{self, Clear, ClearType},
};
use rand::Rng;
use std::io::{self, Write};
use tokio::time::Instant;

const PROGRESS_WIDTH: usize = 20;
const KEY_WIDTH: u16 = 4;
const AVATAR_TOP: u16 = 6;

pub fn draw<R: Rng, W: Write>(out: &mut W, app: &App<R>) -> io::Result<()> {
    let (columns, rows) = terminal::size().unwrap_or((80, 24));
    draw_sized(out, app, columns, rows)
}

pub fn draw_sized<R: Rng, W: Write>(
    out: &mut W,
    app: &App<R>,
    columns: u16,
    rows: u16,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;

    if app.game().state().started {
        game_screen(out, app, columns, rows)?;
    } else {
        start_screen(out, app.game(), columns, rows)?;
    }

    out.flush()
}

fn centered(columns: u16, width: usize) -> u16 {
    columns.saturating_sub(width as u16) / 2
}

pub fn start_screen<R: Rng, W: Write>(
    out: &mut W,
    game: &Game<R>,
    columns: u16,
    rows: u16,
) -> io::Result<()> {
    let x = columns.saturating_sub(20) / 2;
    let y = rows / 2;
    let level = format!("Level {}: {}", game.state().level + 1, game.current_level().name);

    queue!(
        out,
        MoveTo(x, y.saturating_sub(4)),
        PrintStyledContent("Tippen - Zehn Finger, eine Tastatur".bold()),
        MoveTo(x, y.saturating_sub(2)),
        PrintStyledContent(style(level).yellow()),
        MoveTo(x, y),
        PrintStyledContent("Enter - Start".green().bold()),
        MoveTo(x, y + 1),
        PrintStyledContent("ESC - Beenden".red().bold())
    )?;

    Ok(())
}

fn game_screen<R: Rng, W: Write>(
    out: &mut W,
    app: &App<R>,
    columns: u16,
    rows: u16,
) -> io::Result<()> {
    let game = app.game();
    header(out, game)?;

    let view = app.view();
    if let Some(message) = &view.success {
        let line = format!("{} {}", message.icon, message.text);
        queue!(
            out,
            MoveTo(centered(columns, line.chars().count()), 3),
            PrintStyledContent(style(line).magenta().bold())
        )?;
    } else if let Some(caption) = &view.caption {
        queue!(
            out,
            MoveTo(centered(columns, caption.chars().count()), 3),
            PrintStyledContent(style(caption).cyan().bold())
        )?;
    }

    if let Some(frame) = app.avatar_frame() {
        for (i, line) in frame.iter().enumerate() {
            queue!(out, MoveTo(2, AVATAR_TOP + i as u16), Print(line))?;
        }
    }

    word_line(out, game, view.error_flashing(Instant::now()), columns, 5)?;

    let keyboard_top = rows.saturating_sub(9).max(AVATAR_TOP + 6);
    keyboard(out, game, columns, keyboard_top)?;
    if let Some(selected) = view.picker {
        level_picker(out, game, selected, columns)?;
    }
    print_help(out, rows)?;

    Ok(())
}

/// Picker rows, one per level, the highlighted one marked
pub fn picker_lines<R: Rng>(game: &Game<R>, selected: usize) -> Vec<String> {
    game.levels()
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let marker = if i == selected { '>' } else { ' ' };
            format!("{} {:>2}. {}", marker, i + 1, level.name)
        })
        .collect()
}

fn level_picker<R: Rng, W: Write>(
    out: &mut W,
    game: &Game<R>,
    selected: usize,
    columns: u16,
) -> io::Result<()> {
    let lines = picker_lines(game, selected);
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let x = centered(columns, width);

    queue!(
        out,
        MoveTo(x, AVATAR_TOP),
        PrintStyledContent("Level wählen (↑/↓, Enter)".bold())
    )?;
    for (i, line) in lines.into_iter().enumerate() {
        let y = AVATAR_TOP + 1 + i as u16;
        let line = format!("{:<width$}", line);
        if i == selected {
            queue!(out, MoveTo(x, y), PrintStyledContent(style(line).black().on_yellow()))?;
        } else {
            queue!(out, MoveTo(x, y), PrintStyledContent(style(line).yellow()))?;
        }
    }

    Ok(())
}

pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = (progress.min(100) as usize * width) / 100;
    format!("[{}{}] {}%", "█".repeat(filled), "░".repeat(width - filled), progress)
}

fn header<R: Rng, W: Write>(out: &mut W, game: &Game<R>) -> io::Result<()> {
    let state = game.state();
    let title = format!(
        "Level {}/{}: {}",
        state.level + 1,
        game.levels().len(),
        game.current_level().name
    );

    queue!(
        out,
        MoveTo(1, 0),
        PrintStyledContent(style(title).bold()),
        MoveTo(1, 1),
        PrintStyledContent(style(format!("✔ {}", state.correct_count)).green()),
        Print("  "),
        PrintStyledContent(style(format!("✘ {}", state.error_count)).red()),
        Print("  "),
        Print(progress_bar(state.progress, PROGRESS_WIDTH))
    )?;

    Ok(())
}

fn word_line<R: Rng, W: Write>(
    out: &mut W,
    game: &Game<R>,
    flashing: bool,
    columns: u16,
    y: u16,
) -> io::Result<()> {
    let word: Vec<char> = game.display_word().chars().collect();
    if word.is_empty() {
        return Ok(());
    }
    let index = game.state().current_index;

    queue!(out, MoveTo(centered(columns, word.len() + 2), y))?;
    for (i, c) in word.iter().enumerate() {
        if i < index {
            queue!(out, PrintStyledContent(style(*c).green()))?;
        } else if i == index {
            let color = if flashing { Color::Red } else { Color::Yellow };
            queue!(
                out,
                Print('['),
                PrintStyledContent(style(*c).with(color).bold()),
                Print(']')
            )?;
        } else {
            queue!(out, PrintStyledContent(style(*c).white()))?;
        }
    }

    let icons = game.state().current_icons.join(" ");
    if !icons.is_empty() {
        queue!(
            out,
            MoveTo(centered(columns, icons.chars().count()), y + 1),
            Print(icons)
        )?;
    }

    Ok(())
}

/// Styled label for one key
pub fn key_cell(key: char, next: Option<char>, level: &Level) -> StyledContent<String> {
    let label = if key == ' ' {
        format!("{:^21}", "LEERTASTE")
    } else {
        format!(" {} ", key)
    };
    let (r, g, b) = finger_for(key).color();
    let finger = Color::Rgb { r, g, b };

    if next == Some(key) {
        style(label).with(Color::Black).on(finger).bold()
    } else if !level.allows_key(key) {
        style(label).dark_grey()
    } else if is_home_row(key) {
        style(label).with(finger).underlined()
    } else {
        style(label).with(finger)
    }
}

fn keyboard<R: Rng, W: Write>(out: &mut W, game: &Game<R>, columns: u16, top: u16) -> io::Result<()> {
    let level = game.current_level();
    let next = game.next_key();
    let middle = columns / 2;

    for (row, offset) in ROW_OFFSETS.iter().enumerate() {
        let Some((left, right)) = split_row(row) else {
            continue;
        };
        let y = top + row as u16;
        let shift = |x: u16| (x as i16 + offset).max(0) as u16;

        let left_x = middle.saturating_sub(left.len() as u16 * KEY_WIDTH + 2);
        queue!(out, MoveTo(shift(left_x), y))?;
        for key in left {
            queue!(out, PrintStyledContent(key_cell(*key, next, level)), Print(' '))?;
        }

        queue!(out, MoveTo(shift(middle + 2), y))?;
        for key in right {
            queue!(out, PrintStyledContent(key_cell(*key, next, level)), Print(' '))?;
        }
    }

    let space_row = LAYOUT.len() - 1;
    queue!(
        out,
        MoveTo(centered(columns, 21), top + space_row as u16),
        PrintStyledContent(key_cell(' ', next, level))
    )?;

    if let Some(key) = next {
        let hint = format!("Finger: {}", finger_for(key).german_name());
        queue!(
            out,
            MoveTo(centered(columns, hint.len()), top + space_row as u16 + 1),
            PrintStyledContent(style(hint).dark_grey())
        )?;
    }

    Ok(())
}

pub fn print_help<W: Write>(out: &mut W, rows: u16) -> io::Result<()> {
    queue!(
        out,
        MoveTo(0, rows.saturating_sub(1)),
        PrintStyledContent(
            "Enter - Neues Wort  F2 - Level zurück  F3 - Level vor  F5 - Level wählen  ESC - Beenden"
                .yellow()
                .bold()
        )
    )?;

    Ok(())
}
