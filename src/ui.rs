use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::catalog;
use crate::state::{display_name, AppState, EntryStat, FocusArea};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokeComponentId {
    CatalogList,
    Moves,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokeContext {
    CatalogList,
    Moves,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        match self.focus {
            FocusArea::CatalogList => Some(PokeComponentId::CatalogList),
            FocusArea::Moves => Some(PokeComponentId::Moves),
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        None
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::CatalogList => PokeContext::CatalogList,
            PokeComponentId::Moves => PokeContext::Moves,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::CatalogList
    }
}

pub struct PokeUi {
    catalog_list: SelectList,
    move_list: SelectList,
    status_bar: StatusBar,
}

impl Default for PokeUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PokeUi {
    pub fn new() -> Self {
        Self {
            catalog_list: SelectList::new(),
            move_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(36), Constraint::Percentage(64)])
            .split(layout[1]);
        self.render_catalog(frame, body[0], state, event_ctx);
        self.render_detail(frame, body[1], state, event_ctx);
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    pub fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let items = catalog_items(state);
        if items.is_empty() {
            return HandlerResponse::ignored();
        }
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.list_index.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: list_style(None),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::EntrySelect,
            render_item: &|item| item.clone(),
        };
        let actions: Vec<_> = self
            .catalog_list
            .handle_event(event, props)
            .into_iter()
            .collect();
        handler_response(actions)
    }

    pub fn handle_moves_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let items = move_items(state);
        if items.is_empty() {
            return HandlerResponse::ignored();
        }
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.move_index.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: list_style(Some(BG_PANEL_ALT)),
            behavior: SelectListBehavior {
                show_scrollbar: false,
                wrap_navigation: false,
            },
            on_select: Action::MoveSelect,
            render_item: &|item| item.clone(),
        };
        let actions: Vec<_> = self
            .move_list
            .handle_event(event, props)
            .into_iter()
            .collect();
        handler_response(actions)
    }

    fn render_catalog(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        event_ctx.set_component_area(PokeComponentId::CatalogList, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("DEX")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(focus_border(state, FocusArea::CatalogList));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(error) = state.page.error() {
            frame.render_widget(
                Paragraph::new(format!("Page unavailable: {error}"))
                    .style(Style::default().fg(ACCENT_GOLD))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }
        if state.page.is_loading() {
            frame.render_widget(
                Paragraph::new("Loading page...").style(Style::default().fg(TEXT_DIM)),
                inner,
            );
            return;
        }

        let items = catalog_items(state);
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.list_index.min(items.len().saturating_sub(1)),
            is_focused: state.focus == FocusArea::CatalogList,
            style: list_style(None),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::EntrySelect,
            render_item: &|item| item.clone(),
        };
        self.catalog_list.render(frame, inner, props);
    }

    fn render_detail(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("DATA")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(6)])
            .split(inner);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(layout[0]);

        frame.render_widget(
            Paragraph::new(detail_text(state))
                .style(Style::default().fg(TEXT_MAIN))
                .wrap(Wrap { trim: true }),
            top[0],
        );
        frame.render_widget(
            Paragraph::new(stats_text(state)).style(Style::default().fg(TEXT_DIM)),
            top[1],
        );

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1]);
        event_ctx.set_component_area(PokeComponentId::Moves, bottom[0]);
        let list_block = Block::default()
            .borders(Borders::ALL)
            .title("MOVES")
            .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN))
            .border_style(focus_border(state, FocusArea::Moves));
        let list_inner = list_block.inner(bottom[0]);
        frame.render_widget(list_block, bottom[0]);

        let items = move_items(state);
        if items.is_empty() {
            frame.render_widget(
                Paragraph::new("No moves.").style(Style::default().fg(TEXT_DIM)),
                list_inner,
            );
        } else {
            let props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: state.move_index.min(items.len().saturating_sub(1)),
                is_focused: state.focus == FocusArea::Moves,
                style: list_style(Some(BG_PANEL_ALT)),
                behavior: SelectListBehavior {
                    show_scrollbar: false,
                    wrap_navigation: false,
                },
                on_select: Action::MoveSelect,
                render_item: &|item| item.clone(),
            };
            self.move_list.render(frame, list_inner, props);
        }

        let detail_block = Block::default()
            .borders(Borders::ALL)
            .title("MOVE DETAIL")
            .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
        let detail_inner = detail_block.inner(bottom[1]);
        frame.render_widget(detail_block, bottom[1]);
        frame.render_widget(
            Paragraph::new(move_detail_text(state))
                .style(Style::default().fg(TEXT_MAIN))
                .wrap(Wrap { trim: true }),
            detail_inner,
        );
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let selected = state
        .selected
        .as_ref()
        .map(|entry| entry.name.to_ascii_uppercase())
        .unwrap_or_else(|| "--".to_string());
    let header = Line::from(vec![
        Span::styled("POKEDEX", title_style),
        Span::raw("  |  "),
        Span::styled(state.page_label(), Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  Selected: "),
        Span::styled(selected, Style::default().fg(ACCENT_TEAL)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(Paragraph::new(header).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.page.is_loading() {
            "Loading page...".to_string()
        } else if state.detail.is_loading() {
            "Loading pokemon...".to_string()
        } else if state.enrichment.is_resolving() {
            "Loading evolution...".to_string()
        } else if state.move_detail.is_loading() {
            "Loading move...".to_string()
        } else {
            "".to_string()
        }
    });
    let left_hints = status_hints(state);
    let center_hints = vec![
        StatusBarHint::new("Tab", "Focus"),
        StatusBarHint::new(page_keys(state.offset), "Page"),
        StatusBarHint::new("q", "Quit"),
    ];
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

/// Only the page directions that can still move.
fn page_keys(offset: usize) -> &'static str {
    if catalog::is_first_page(offset) {
        "]"
    } else if catalog::is_last_page(offset) {
        "["
    } else {
        "[ ]"
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    match state.focus {
        FocusArea::CatalogList => vec![StatusBarHint::new("j/k", "Select")],
        FocusArea::Moves => vec![StatusBarHint::new("j/k", "Inspect")],
    }
}

fn catalog_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .entries()
        .iter()
        .enumerate()
        .map(|(idx, entry)| Line::from(format!("#{:04} {}", state.offset + idx + 1, entry.name)))
        .collect()
}

fn move_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .move_shortcuts()
        .iter()
        .map(|name| Line::from(display_name(name)))
        .collect()
}

fn detail_text(state: &AppState) -> Text<'static> {
    let Some(entry) = state.selected.as_ref() else {
        return Text::from("Select a Pokemon.");
    };
    if let Some(error) = state.detail.error() {
        return Text::from(vec![
            Line::from(Span::styled(
                entry.name.to_ascii_uppercase(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Unavailable: {error}"),
                Style::default().fg(ACCENT_GOLD),
            )),
        ]);
    }
    let Some(detail) = state.current_detail() else {
        return Text::from(format!("Loading {}...", entry.name));
    };
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}  #{:03}", detail.name.to_ascii_uppercase(), detail.id),
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Height: {}", detail.height)),
        Line::from(format!("Weight: {}", detail.weight)),
        Line::from(format!("Type: {}", detail.types.join(", "))),
        Line::from(Span::styled(
            detail.sprite_url.clone(),
            Style::default().fg(TEXT_DIM),
        )),
    ];
    if let Some(evolution) = state.evolution_line() {
        lines.push(Line::from(" "));
        lines.push(Line::from(format!("Evolution Chain: {evolution}")));
    }
    Text::from(lines)
}

fn stats_text(state: &AppState) -> Text<'static> {
    let Some(detail) = state.current_detail() else {
        return Text::default();
    };
    Text::from(
        detail
            .stats
            .iter()
            .map(|stat| Line::from(render_stat(stat)))
            .collect::<Vec<_>>(),
    )
}

fn move_detail_text(state: &AppState) -> Text<'static> {
    if let Some(error) = state.move_detail.error() {
        return Text::from(format!("Move unavailable: {error}"));
    }
    if state.move_detail.is_loading() {
        let name = state
            .move_shortcuts()
            .get(state.move_index)
            .map(|name| display_name(name))
            .unwrap_or_default();
        return Text::from(format!("Loading move: {name}..."));
    }
    let Some(detail) = state.current_move() else {
        return Text::from("No move selected.");
    };
    Text::from(vec![
        Line::from(Span::styled(
            display_name(&detail.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Power: {}", detail.power_label())),
        Line::from(format!("Accuracy: {}", detail.accuracy_label())),
        Line::from(format!("PP: {}", detail.power_points)),
        Line::from(format!("Type: {}", detail.type_name)),
    ])
}

fn list_style(bg: Option<Color>) -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn render_stat(stat: &EntryStat) -> String {
    let label = shorten_stat(&stat.name);
    let bar_len = (stat.value as usize / 10).clamp(1, 20);
    let bar = "#".repeat(bar_len);
    format!("{label:>4} {value:>3} {bar}", value = stat.value)
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

fn focus_border(state: &AppState, area: FocusArea) -> Style {
    if state.focus == area {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}
