//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::state::{App, AppMode, ConfirmAction, InputField};
use crate::models::Item;
use components::{render_dialog_framework, render_input_widget};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(5),    // 清单
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_help(frame, app, chunks[2]);

    // 渲染弹窗
    match app.mode() {
        AppMode::AddingItem => render_add_dialog(frame, app),
        AppMode::Confirm(action) => render_confirm_dialog(frame, app, &action),
        AppMode::Normal | AppMode::EditingItem(_) => {} // 编辑在列表行内进行
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let total: u64 = app
        .list
        .items()
        .iter()
        .map(|item| u64::from(item.quantity))
        .sum();
    let title = Paragraph::new(format!(
        "🛒 购物清单  ({} 项, 共 {} 件)",
        app.list.len(),
        total
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    if app.list.is_empty() {
        let empty = Paragraph::new("清单为空，按 'a' 添加第一项")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().title("清单").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .list
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if app.list.is_editing(item.id) {
                editor_line(app, item)
            } else {
                item_line(app, item, i == app.selected_index)
            }
        })
        .collect();

    let list_widget = List::new(items)
        .block(Block::default().title("清单").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list_widget, area, &mut state);
}

fn item_line<'a>(app: &App, item: &'a Item, selected: bool) -> ListItem<'a> {
    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut spans = Vec::new();
    if app.settings.show_ids {
        spans.push(Span::styled(
            format!("#{:<3} ", item.id),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(format!("{:<24}", item.name), style));
    spans.push(Span::styled(format!("x{}", item.quantity), style));

    ListItem::new(Line::from(spans))
}

/// 行内编辑器
fn editor_line(app: &App, item: &Item) -> ListItem<'static> {
    let field_style = |field: InputField| {
        if app.edit.field == field {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        }
    };

    let mut spans = Vec::new();
    if app.settings.show_ids {
        spans.push(Span::styled(
            format!("#{:<3} ", item.id),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(
        format!("[{}]", app.edit.name),
        field_style(InputField::Name),
    ));
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("[{}]", app.edit.quantity),
        field_style(InputField::Quantity),
    ));
    spans.push(Span::styled(
        "  ✎ 编辑中",
        Style::default().fg(Color::Gray),
    ));

    ListItem::new(Line::from(spans))
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.mode() {
        AppMode::Normal => "[a] 添加  [e] 编辑  [d] 删除  [j/k] 导航  [q] 退出",
        AppMode::AddingItem => "[Tab] 切换字段  [Enter] 添加  [Esc] 取消",
        AppMode::EditingItem(_) => "[Tab] 切换字段  [Enter] 保存  [Esc] 放弃",
        AppMode::Confirm(_) => "[y] 确认  [n] 取消",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_add_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 50, frame.area());
    let inner = render_dialog_framework(frame, area, "添加条目");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    render_input_widget(
        frame,
        chunks[0],
        "名称",
        app.list.draft_name(),
        app.add_field == InputField::Name,
        Color::Yellow,
    );
    render_input_widget(
        frame,
        chunks[1],
        "数量",
        app.list.draft_quantity(),
        app.add_field == InputField::Quantity,
        Color::Yellow,
    );

    frame.render_widget(
        Paragraph::new("Tab 切换字段，Enter 添加，Esc 取消").style(Style::default().fg(Color::Gray)),
        chunks[2],
    );
}

fn render_confirm_dialog(frame: &mut Frame, app: &App, action: &ConfirmAction) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let message = match action {
        ConfirmAction::Delete(id) => match app.list.get(*id) {
            Some(item) => format!("确认删除 {}？", item.name),
            None => "确认删除该条目？".to_string(),
        },
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] 确认  [n] 取消", message))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("⚠️ 确认操作").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::models::ShoppingList;
    use crate::ui::actions::Action;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with_milk() -> App {
        let mut app = App::new(ShoppingList::new(), UiConfig::default());
        app.dispatch(Action::OpenAddDialog);
        for c in "Milk".chars() {
            app.dispatch(Action::Input(c));
        }
        app.dispatch(Action::NextField);
        app.dispatch(Action::Input('2'));
        app.dispatch(Action::Submit);
        app
    }

    #[test]
    fn test_render_items() {
        let screen = draw(&app_with_milk());
        assert!(screen.contains("Milk"));
        assert!(screen.contains("x2"));
    }

    #[test]
    fn test_render_total_beyond_u32() {
        let mut app = App::new(ShoppingList::new(), UiConfig::default());
        for name in ["Rice", "Salt"] {
            app.dispatch(Action::OpenAddDialog);
            for c in name.chars() {
                app.dispatch(Action::Input(c));
            }
            app.dispatch(Action::NextField);
            for c in "4000000000".chars() {
                app.dispatch(Action::Input(c));
            }
            app.dispatch(Action::Submit);
        }
        assert_eq!(app.list.len(), 2);

        let screen = draw(&app);
        assert!(screen.contains("8000000000"));
    }

    #[test]
    fn test_render_add_dialog() {
        let mut app = App::new(ShoppingList::new(), UiConfig::default());
        app.dispatch(Action::OpenAddDialog);
        for c in "Tea".chars() {
            app.dispatch(Action::Input(c));
        }
        let screen = draw(&app);
        assert!(screen.contains("Tea"));
    }

    #[test]
    fn test_render_inline_editor() {
        let mut app = app_with_milk();
        app.dispatch(Action::StartEdit);
        app.dispatch(Action::Input('s'));
        let screen = draw(&app);
        assert!(screen.contains("[Milks]"));
    }
}
