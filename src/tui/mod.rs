use std::{io, path::Path, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use log::info;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::Color,
    symbols::Marker,
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Line},
    },
};

use crate::{
    metrics::{DataPoint, export_csv_file, observe, plot_results},
    relativity::special::{Boost, lorentz_factor},
    scene::{format_rounded, ltf::{STAR_X, Trip}},
};

const STEP: f64 = 0.01;
const MAX_SPEED: f64 = 0.99;
/// Half the visible extent of the diagram in light-years.
const VIEW: f64 = 10.0;
/// Lines are drawn this far out so boosted ones still cross the whole view.
const REACH: f64 = 40.0;

/// A coloured line in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: Color,
}

/// Interactive state: the observer's velocity and every velocity visited so far.
struct App {
    trip: Trip,
    velocity: f64,
    log: Vec<DataPoint>,
}

impl App {
    fn new(rocket_speed: f64) -> Self {
        Self {
            trip: Trip::new(rocket_speed),
            velocity: 0.0,
            log: Vec::new(),
        }
    }

    fn set_velocity(&mut self, velocity: f64) {
        // snap to the 0.01 grid
        self.velocity = (velocity.clamp(-MAX_SPEED, MAX_SPEED) * 100.0).round() / 100.0;
        self.log.push(observe(&self.trip, self.velocity));
    }

    /// Returns false once the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Right => self.set_velocity(self.velocity + STEP),
            KeyCode::Left => self.set_velocity(self.velocity - STEP),
            KeyCode::Char('r') => self.set_velocity(self.trip.speed),
            KeyCode::Char('0') => self.set_velocity(0.0),
            KeyCode::Char('q') | KeyCode::Esc => return false,
            _ => {}
        }
        true
    }
}

/// Everything on the diagram for an observer at `v`: the stars' axes and light cone stay
/// put, while the boosted grid axes, the stars and the rocket are moved into the observer's frame.
pub fn diagram(trip: &Trip, v: f64) -> Vec<Segment> {
    let boost = Boost::new(v);
    let boosted = |(x, t): (f64, f64)| {
        let [x, t, _] = boost.apply([x, t, 0.0]);
        (x, t)
    };
    let line = |from, to, color| Segment { from, to, color };
    let moved = |from, to, color| Segment {
        from: boosted(from),
        to: boosted(to),
        color,
    };

    vec![
        line((-REACH, 0.0), (REACH, 0.0), Color::DarkGray),
        line((0.0, -REACH), (0.0, REACH), Color::DarkGray),
        line((-REACH, -REACH), (REACH, REACH), Color::Yellow),
        line((-REACH, REACH), (REACH, -REACH), Color::Yellow),
        moved((-REACH, 0.0), (REACH, 0.0), Color::Red),
        moved((0.0, -REACH), (0.0, REACH), Color::Red),
        moved((-STAR_X, -REACH), (-STAR_X, REACH), Color::Rgb(0xFF, 0x86, 0x2F)),
        moved((STAR_X, -REACH), (STAR_X, REACH), Color::Rgb(0x9A, 0x72, 0xAC)),
        moved(trip.launch, trip.landing, Color::White),
    ]
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
        ])
        .split(f.area());
    let stats = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[0]);

    let point = observe(&app.trip, app.velocity);
    let ((x0, t0), (x1, t1)) = app.trip.boosted(app.velocity);

    let texts = [
        format!("v(S′) = {}c", format_rounded(app.velocity, 2)),
        format!("γ = {:.4}", lorentz_factor(app.velocity)),
        format!(
            "stars {:.2} ly apart (rest {:.2})",
            point.contracted_separation, point.separation
        ),
    ];
    for (text, area) in texts.into_iter().zip(stats.iter()) {
        f.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
            *area,
        );
    }
    f.render_widget(
        Paragraph::new(format!(
            "Δct′ = {:.2} ly (Δct = {:.2} ly, rocket at {}c)   ←/→ change v   r rocket frame   0 star frame   q quit",
            point.boosted_interval,
            point.interval,
            format_rounded(app.trip.speed, 2),
        ))
        .block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let segments = diagram(&app.trip, app.velocity);
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Minkowski diagram (x, ct)"))
        .marker(Marker::Braille)
        .x_bounds([-VIEW, VIEW])
        .y_bounds([-VIEW, VIEW])
        .paint(move |ctx| {
            for s in &segments {
                ctx.draw(&Line::new(s.from.0, s.from.1, s.to.0, s.to.1, s.color));
            }
            ctx.print(x0, t0, "launch");
            ctx.print(x1, t1, "landing");
            ctx.print(VIEW - 1.0, 0.5, "x");
            ctx.print(0.5, VIEW - 1.0, "ct");
        });
    f.render_widget(canvas, chunks[2]);
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Input handling
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    return Ok(());
                }
            }
        }
    }
}

pub fn start(rocket_speed: f64, csv_path: &Path, plot_path: &Path) -> anyhow::Result<()> {
    // Setup terminal
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    crossterm::terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(rocket_speed);
    let result = run(&mut terminal, &mut app);

    crossterm::terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    info!("visited {} velocities", app.log.len());
    if !app.log.is_empty() {
        export_csv_file(&app.log, csv_path)?;
        plot_results(&app.log, plot_path, "Rocket trip vs observer velocity")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq::ApproxEq;

    fn slope(s: &Segment) -> f64 {
        (s.to.1 - s.from.1) / (s.to.0 - s.from.0)
    }

    #[test]
    fn rest_frame_boosted_axes_coincide() {
        let segments = diagram(&Trip::new(0.5), 0.0);
        assert_eq!(segments[4].from, segments[0].from);
        assert_eq!(segments[4].to, segments[0].to);
        assert_eq!(segments[5].from, segments[1].from);
    }

    #[test]
    fn boosted_axes_tilt_towards_the_light_cone() {
        let segments = diagram(&Trip::new(0.5), 0.5);
        assert!(slope(&segments[4]).approx_eq(-0.5));
        // ct axis: x = -v t, so dt/dx = -1/v
        assert!(slope(&segments[5]).approx_eq(-2.0));
    }

    #[test]
    fn rocket_is_at_rest_in_its_own_frame() {
        let trip = Trip::new(0.5);
        let rocket = diagram(&trip, 0.5)[8];
        assert!(rocket.from.0.approx_eq(0.0));
        assert!(rocket.to.0.approx_eq(0.0));
    }

    #[test]
    fn keys_step_and_clamp_velocity() {
        let mut app = App::new(0.5);
        for _ in 0..50 {
            assert!(app.handle_key(KeyCode::Right));
        }
        assert_eq!(app.velocity, 0.5);
        for _ in 0..200 {
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.velocity, MAX_SPEED);
        app.handle_key(KeyCode::Char('0'));
        assert_eq!(app.velocity, 0.0);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.velocity, 0.5);
        assert_eq!(app.log.len(), 252);
        assert!(!app.handle_key(KeyCode::Char('q')));
    }
}
