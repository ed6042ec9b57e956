//! ttk-demo - draws a small interactive screen through the backend-neutral API.
//!
//! Arrow keys or a click move the marker; `q`, Escape or File > Quit exit.

#![allow(clippy::doc_markdown, clippy::uninlined_format_args)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use ttk::{
    logging, BackendKind, InputEvent, KeyCode, Menu, MenuBar, MenuItem, MouseEventKind,
    PerformanceMonitor, RecordingRenderer, Renderer, Rgb, TextAttribute, TtkError,
};

#[derive(Parser)]
#[command(name = "ttk-demo")]
#[command(about = "Interactive demo of the TTK rendering API")]
#[command(version)]
struct Cli {
    /// Backend to run on (terminal, recording); defaults to TTK_BACKEND or terminal
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directives (overrides TTK_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

const PAIR_FRAME: i32 = 1;
const PAIR_MARKER: i32 = 2;
const PAIR_STATUS: i32 = 3;

const QUIT_ITEM: &str = "file.quit";

struct Demo {
    marker: (i32, i32),
    last_event: String,
    perf: PerformanceMonitor,
    quit: bool,
}

impl Demo {
    fn new() -> Self {
        Self {
            marker: (2, 2),
            last_event: "none".to_string(),
            perf: PerformanceMonitor::default(),
            quit: false,
        }
    }

    fn setup(r: &mut dyn Renderer) -> ttk::Result<()> {
        r.init_color_pair(PAIR_FRAME, Rgb::new(90, 160, 255), Rgb::new(16, 16, 24))?;
        r.init_color_pair(PAIR_MARKER, Rgb::new(255, 220, 0), Rgb::new(16, 16, 24))?;
        r.init_color_pair(PAIR_STATUS, Rgb::new(16, 16, 24), Rgb::new(180, 180, 180))?;
        r.update_background(Rgb::new(16, 16, 24));
        r.set_menu_bar(&MenuBar {
            menus: vec![Menu {
                title: "File".to_string(),
                items: vec![MenuItem::new(QUIT_ITEM, "Quit").with_shortcut("Cmd+Q")],
            }],
        });
        r.set_cursor_visibility(false);
        Ok(())
    }

    fn draw(&mut self, r: &mut dyn Renderer) -> ttk::Result<()> {
        self.perf.start_frame();
        self.perf.start_render();

        let (rows, cols) = r.get_dimensions();
        r.clear();
        r.draw_rect(0, 0, (rows - 1).max(0), cols, PAIR_FRAME, false)?;
        r.draw_text(0, 2, " ttk demo ", PAIR_FRAME, TextAttribute::BOLD)?;
        r.draw_text(1, 2, "arrows/click: move   q: quit", 0, TextAttribute::NORMAL)?;

        self.marker.0 = self.marker.0.clamp(1, (rows - 3).max(1));
        self.marker.1 = self.marker.1.clamp(1, (cols - 2).max(1));
        r.draw_text(self.marker.0, self.marker.1, "@", PAIR_MARKER, TextAttribute::BOLD)?;

        let status = format!(
            " {}x{}  fps {:.1}  last: {}",
            cols,
            rows,
            self.perf.fps(),
            self.last_event
        );
        r.draw_rect(rows - 1, 0, 1, cols, PAIR_STATUS, true)?;
        r.draw_text(rows - 1, 0, &status, PAIR_STATUS, TextAttribute::NORMAL)?;
        r.set_caret_position(self.marker.0, self.marker.1);
        r.refresh()?;

        self.perf.end_render();
        Ok(())
    }

    fn handle(&mut self, event: &InputEvent) {
        self.last_event = format!("{:?}", event);
        match event {
            InputEvent::Key { code, .. } => match code {
                KeyCode::Up => self.marker.0 -= 1,
                KeyCode::Down => self.marker.0 += 1,
                KeyCode::Left => self.marker.1 -= 1,
                KeyCode::Right => self.marker.1 += 1,
                KeyCode::Escape | KeyCode::Char('q') => self.quit = true,
                _ => {}
            },
            InputEvent::Char('q') | InputEvent::Close => self.quit = true,
            InputEvent::Menu(id) if id == QUIT_ITEM => self.quit = true,
            InputEvent::Mouse(m) if m.kind == MouseEventKind::ButtonDown => {
                self.marker = (m.row, m.col);
            }
            _ => {}
        }
    }

    fn run(&mut self, r: &mut dyn Renderer, frames: Option<u64>) -> ttk::Result<()> {
        Self::setup(r)?;
        while !self.quit && frames.map_or(true, |limit| self.perf.total_frames() < limit) {
            self.draw(r)?;
            if let Some(event) = r.get_input(100)? {
                tracing::debug!(?event, "input");
                self.handle(&event);
            }
        }
        tracing::info!(summary = ?self.perf.summary(), "demo finished");
        Ok(())
    }
}

fn init_logging(cli: &Cli, kind: BackendKind) -> ttk::Result<()> {
    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            logging::init(cli.log.as_deref(), Mutex::new(file))
        }
        // Only the recording backend leaves stderr free.
        None if kind == BackendKind::Recording => logging::init(cli.log.as_deref(), std::io::stderr),
        None => Ok(()),
    }
}

fn run(cli: &Cli) -> ttk::Result<()> {
    let kind = cli.backend.unwrap_or_else(BackendKind::recommended);
    init_logging(cli, kind)?;
    tracing::debug!(backend = %kind, "starting demo");

    match kind {
        BackendKind::Recording => {
            let script = [
                InputEvent::key(KeyCode::Right, ttk::Modifiers::NONE),
                InputEvent::key(KeyCode::Down, ttk::Modifiers::NONE),
                InputEvent::Char('q'),
            ];
            let mut recorder = RecordingRenderer::default().with_input(script);
            recorder.initialize()?;
            let result = Demo::new().run(&mut recorder, cli.frames);
            recorder.shutdown();
            for command in recorder.commands() {
                println!("{}", command.to_json_string());
            }
            result
        }
        BackendKind::Desktop => Err(TtkError::Init(
            "ttk-demo has no platform window; use the terminal or recording backend".to_string(),
        )),
        BackendKind::Terminal => {
            let mut renderer = kind.create()?;
            renderer.initialize()?;
            let result = Demo::new().run(renderer.as_mut(), cli.frames);
            renderer.shutdown();
            result
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ttk-demo: {err}");
            ExitCode::FAILURE
        }
    }
}
