//! Interactive booking console over the `gic_cinema` engine.
//!
//! One screen per session: the operator defines the title and layout, then
//! customers book tickets, optionally steer their block with a seat code
//! (`B07` style), and confirm. All input recovery (re-prompts on bad data)
//! lives here; the engine itself never retries.

use std::io::{self, BufRead, Write};

use gic_cinema::{
    BookingConfig, Cinema, FileSink, LogLevel, Logger, ReserveOutcome, Result, parse_seat_code,
    write_screen_view,
};

const LOG_TARGET: &str = "cinema::console";
const LOG_FILE: &str = "gic-cinema.log";
const LOG_CAP_BYTES: u64 = 512 * 1024;

fn main() {
    let mut config = BookingConfig::default();
    config.enable_metrics();
    if let Ok(sink) = FileSink::new(LOG_FILE, LOG_CAP_BYTES) {
        config.logger = Some(Logger::new(sink));
    }
    let mut cinema = Cinema::with_config(config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();
    if let Err(err) = run(&mut cinema, &mut input, &mut out) {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}

/// Drive the full console session over any line source and writer.
fn run(cinema: &mut Cinema, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
    let Some(title) = define_screen(cinema, input, out)? else {
        return Ok(());
    };

    loop {
        writeln!(out, "Welcome to GIC Cinemas!")?;
        writeln!(
            out,
            "[1] Book tickets for {title} ({} seats available)",
            cinema.seats_available(&title)
        )?;
        writeln!(out, "[2] Check reservations")?;
        writeln!(out, "[3] Exit")?;
        let Some(choice) = prompt(input, out, "Please enter your selection:")? else {
            break;
        };
        match choice.as_str() {
            "1" => {
                if booking_flow(cinema, &title, input, out)?.is_none() {
                    break;
                }
            }
            "2" => {
                if check_flow(cinema, &title, input, out)?.is_none() {
                    break;
                }
            }
            "3" => break,
            _ => writeln!(out, "Please pick 1, 2 or 3.")?,
        }
    }

    writeln!(out, "Thank you for using GIC Cinemas, bye!")?;
    emit_session_metrics(cinema);
    Ok(())
}

/// Loop until the operator supplies `[Title] [Rows] [SeatsPerRow]`.
/// Returns the folded title, or `None` on end of input.
fn define_screen(
    cinema: &mut Cinema,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<String>> {
    loop {
        let Some(line) = prompt(
            input,
            out,
            "Please define movie title and seat map in [Title] [Rows] [SeatsPerRow] format:",
        )?
        else {
            return Ok(None);
        };
        let mut parts = line.split_whitespace();
        let (Some(title), Some(rows), Some(seats)) = (parts.next(), parts.next(), parts.next())
        else {
            writeln!(out, "Expected three values, e.g.: Inception 8 10")?;
            continue;
        };
        let (Ok(rows), Ok(seats)) = (rows.parse::<usize>(), seats.parse::<usize>()) else {
            writeln!(out, "Rows and seats per row must be numbers.")?;
            continue;
        };
        match cinema.create_screen(title, rows, seats) {
            Ok(_) => return Ok(Some(title.trim().to_lowercase())),
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}

/// Book-and-confirm loop. `Ok(Some(()))` returns to the menu, `Ok(None)`
/// means the input ended.
fn booking_flow(
    cinema: &mut Cinema,
    title: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<()>> {
    loop {
        let Some(line) = prompt(
            input,
            out,
            "Enter number of tickets to purchase. [ENTER to return to main menu]:",
        )?
        else {
            return Ok(None);
        };
        if line.is_empty() {
            return Ok(Some(()));
        }
        let Ok(tickets) = line.parse::<usize>() else {
            writeln!(out, "That is not a number.")?;
            continue;
        };
        if tickets == 0 {
            writeln!(out, "At least one ticket, surely.")?;
            continue;
        }

        let outcome = cinema.reserve(title, None, tickets, None)?;
        let id = match outcome {
            ReserveOutcome::Shortfall { available, .. } => {
                writeln!(out, "Sorry, there are only {available} seats available.")?;
                continue;
            }
            ReserveOutcome::Reserved(reservation) => reservation.id().as_str().to_string(),
        };
        writeln!(out, "Successfully reserved {tickets} {title} tickets.")?;
        writeln!(out, "Reservation id: {id}")?;

        loop {
            writeln!(out, "Selected seats:")?;
            writeln!(out)?;
            let grid = cinema.render_map(title, &id)?;
            write_screen_view(out, &grid)?;
            let Some(choice) = prompt(
                input,
                out,
                "[ENTER] to accept seat selection, or enter a new starting seat (one letter for the row, two digits for the seat):",
            )?
            else {
                return Ok(None);
            };
            if choice.is_empty() {
                cinema.confirm(title, &id)?;
                writeln!(out, "Reservation {id} confirmed, enjoy the movie!")?;
                break;
            }
            let (rows, seats_per_row) = match cinema.screen(title) {
                Some(screen) => (screen.row_count(), screen.seats_per_row()),
                None => (0, 0),
            };
            match parse_seat_code(&choice, rows, seats_per_row) {
                Some((row, col)) => {
                    if let ReserveOutcome::Shortfall { available, .. } =
                        cinema.reserve(title, Some(&id), tickets, Some((row, col)))?
                    {
                        writeln!(out, "Sorry, there are only {available} seats available.")?;
                    }
                }
                None => writeln!(out, "Seat codes look like B07.")?,
            }
        }
    }
}

/// Look up a reservation by id and show its seats.
fn check_flow(
    cinema: &mut Cinema,
    title: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<()>> {
    loop {
        let Some(id) = prompt(
            input,
            out,
            "Enter your reservation id. [ENTER to return to main menu]:",
        )?
        else {
            return Ok(None);
        };
        if id.is_empty() {
            return Ok(Some(()));
        }
        match cinema.render_map(title, &id) {
            Ok(grid) => {
                writeln!(out, "Reservation {id} seats:")?;
                writeln!(out)?;
                write_screen_view(out, &grid)?;
            }
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}

fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    text: &str,
) -> Result<Option<String>> {
    writeln!(out, "{text}")?;
    write!(out, "> ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn emit_session_metrics(cinema: &Cinema) {
    let (Some(logger), Some(metrics)) = (
        cinema.config().logger.clone(),
        cinema.config().metrics_handle(),
    ) else {
        return;
    };
    if let Ok(guard) = metrics.lock() {
        let _ = logger.log_event(guard.snapshot().to_log_event(LOG_TARGET));
    }
    let _ = logger.log(LogLevel::Info, LOG_TARGET, "session_closed");
}
