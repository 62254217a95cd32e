use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api;
use pokedex::effect::Effect;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::state::{AppState, EvolutionPlaceholder};
use pokedex::ui::{PokeComponentId, PokeContext, PokeUi};

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Paged Pokedex viewer backed by PokeAPI")]
struct Args {
    /// Catalog offset to open at (snapped to a page boundary)
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// What the evolution section shows while it is still loading
    #[arg(long, value_enum, default_value_t = EvolutionPlaceholder::Hidden)]
    evolution_placeholder: EvolutionPlaceholder,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        offset,
        evolution_placeholder,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let _log_guard = logging::init_logging(log_file.as_deref());
    let debug = DebugSession::new(debug_args);

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(offset, evolution_placeholder))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!(offset, ?evolution_placeholder, "starting viewer");
    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(PokeComponentId::CatalogList, move |event, state| {
        ui_list
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_moves = Rc::clone(&ui);
    bus.register(PokeComponentId::Moves, move |event, state| {
        ui_moves
            .borrow_mut()
            .handle_moves_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab | crossterm::event::KeyCode::BackTab => {
                HandlerResponse::action(Action::FocusNext)
            }
            crossterm::event::KeyCode::Char(']') | crossterm::event::KeyCode::Right => {
                HandlerResponse::action(Action::PageNext)
            }
            crossterm::event::KeyCode::Char('[') | crossterm::event::KeyCode::Left => {
                HandlerResponse::action(Action::PagePrev)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    tracing::debug!(?effect, "spawning effect");
    match effect {
        Effect::LoadPage { offset } => {
            ctx.tasks().spawn(TaskKey::new("page"), async move {
                match api::fetch_catalog_page(offset).await {
                    Ok(entries) => Action::PageDidLoad { offset, entries },
                    Err(error) => Action::PageDidError { offset, error },
                }
            });
        }
        Effect::LoadEntryDetail { token, url } => {
            ctx.tasks().spawn(TaskKey::new("entry_detail"), async move {
                match api::fetch_entry_detail(&url).await {
                    Ok(detail) => Action::EntryDidLoad { token, detail },
                    Err(error) => Action::EntryDidError { token, error },
                }
            });
        }
        Effect::LoadSpecies { token, name } => {
            ctx.tasks().spawn(TaskKey::new("entry_species"), async move {
                match api::fetch_species(&name).await {
                    Ok(species) => Action::SpeciesDidLoad { token, species },
                    Err(error) => Action::SpeciesDidError { token, error },
                }
            });
        }
        Effect::LoadEvolutionChain { token, url } => {
            ctx.tasks().spawn(TaskKey::new("entry_evolution"), async move {
                match api::fetch_evolution_path(&url).await {
                    Ok(path) => Action::EvolutionDidLoad { token, path },
                    Err(error) => Action::EvolutionDidError { token, error },
                }
            });
        }
        Effect::LoadMoveDetail { token, name } => {
            ctx.tasks().spawn(TaskKey::new("move"), async move {
                match api::fetch_move_detail(&name).await {
                    Ok(detail) => Action::MoveDidLoad { token, detail },
                    Err(error) => Action::MoveDidError { token, name, error },
                }
            });
        }
    }
}
