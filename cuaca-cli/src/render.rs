//! Terminal rendering for snapshots, failures and session phases.
//!
//! Output stays line-oriented plain text; the persisted theme flag only
//! changes the accent colors.

use chrono::{Local, TimeZone};
use console::Style;
use cuaca_core::{Phase, WeatherError, WeatherSnapshot};

/// Hourly rows printed per snapshot; the full series stays in the data.
const HOURLY_SHOWN: usize = 8;

struct Theme {
    heading: Style,
    label: Style,
    value: Style,
    error: Style,
}

impl Theme {
    fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                heading: Style::new().cyan().bold(),
                label: Style::new().dim(),
                value: Style::new().white().bold(),
                error: Style::new().red().bold(),
            }
        } else {
            Self {
                heading: Style::new().blue().bold(),
                label: Style::new().dim(),
                value: Style::new().bold(),
                error: Style::new().red(),
            }
        }
    }
}

/// Dark-palette signal for terminals that advertise their colors.
///
/// Absent or unparsable `COLORFGBG` reads as light.
pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG").ok().as_deref().map(dark_background).unwrap_or(false)
}

// `COLORFGBG` looks like "15;0": foreground;background ANSI codes. The low
// palette half plus 8 are the dark backgrounds.
fn dark_background(colorfgbg: &str) -> bool {
    colorfgbg
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}

pub fn banner(dark: bool) {
    let theme = Theme::for_mode(dark);
    println!("{}", theme.heading.apply_to("cuaca: perkiraan cuaca dari terminal"));
}

/// Render whatever the session currently shows. Idle prints nothing.
pub fn phase(phase: &Phase, dark: bool) {
    match phase {
        Phase::Idle => {}
        Phase::Loading => {
            let theme = Theme::for_mode(dark);
            println!("{}", theme.label.apply_to("Memuat data cuaca..."));
        }
        Phase::Ready(snap) => snapshot(snap, dark),
        Phase::Failed(err) => failure(err, dark),
    }
}

pub fn snapshot(snapshot: &WeatherSnapshot, dark: bool) {
    let theme = Theme::for_mode(dark);
    let current = &snapshot.current;

    let place = match &current.state {
        Some(state) => format!("{}, {}, {}", current.city, state, current.country),
        None => format!("{}, {}", current.city, current.country),
    };

    println!();
    println!("{}", theme.heading.apply_to(place));
    println!(
        "{}  {}",
        theme.value.apply_to(format!("{}°C", current.temperature)),
        current.description
    );
    println!("{}", theme.label.apply_to(format!("Terasa seperti {}°", current.feels_like)));
    println!();
    println!("  {}  {}%", theme.label.apply_to("Kelembapan"), current.humidity);
    println!("  {}  {} km/j", theme.label.apply_to("Angin     "), current.wind_speed_kmh);
    println!("  {}  {}", theme.label.apply_to("Kondisi   "), current.condition);
    println!(
        "  {}  {}   {}  {}",
        theme.label.apply_to("Terbit    "),
        clock(current.sunrise),
        theme.label.apply_to("Terbenam"),
        clock(current.sunset),
    );

    if !snapshot.hourly.is_empty() {
        println!();
        println!("{}", theme.heading.apply_to("Per jam"));
        for (i, hour) in snapshot.hourly.iter().take(HOURLY_SHOWN).enumerate() {
            let when = if i == 0 { "Now".to_string() } else { clock(hour.time) };
            println!("  {:>5}  {:>4}  {}", when, format!("{}°", hour.temperature), hour.description);
        }
    }

    if !snapshot.daily.is_empty() {
        println!();
        println!("{}", theme.heading.apply_to("Harian"));
        for (i, day) in snapshot.daily.iter().enumerate() {
            let name = if i == 0 { "Hari Ini" } else { day.day_name.as_str() };
            println!(
                "  {:<9}  {:>4} / {:<4}  {}",
                name,
                format!("{}°", day.temp_high),
                format!("{}°", day.temp_low),
                day.description,
            );
        }
    }

    println!();
}

/// Localized title plus the message carried by the error, to stderr.
pub fn failure(err: &WeatherError, dark: bool) {
    let theme = Theme::for_mode(dark);

    eprintln!();
    eprintln!("{}", theme.error.apply_to(title_for(err)));
    eprintln!("{}", err.message());
}

fn title_for(err: &WeatherError) -> &'static str {
    match err {
        WeatherError::NotFound(_) => "Kota Tidak Ditemukan",
        WeatherError::Api(_) => "Kesalahan Layanan",
        WeatherError::Network(_) => "Kesalahan Koneksi",
    }
}

fn clock(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
