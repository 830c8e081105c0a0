mod config;
mod error;
mod logger;
mod models;
mod ui;

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::config::Config;
use crate::models::ShoppingList;
use crate::ui::{App, render};

fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init(&config.logging)?;

    // 清单只存在于本次会话
    let list = ShoppingList::with_policy(config.list.invalid_quantity);
    let mut app = App::new(list, config.ui);

    // 设置终端
    enable_raw_mode().context("无法进入 raw 模式")?;
    let mut terminal = match setup_terminal(io::stdout()) {
        Ok(terminal) => terminal,
        Err(err) => {
            // 初始化失败也要退出 raw 模式
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            let _ = disable_raw_mode();
            return Err(err).context("无法初始化终端");
        }
    };

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    log::info!("session closed with {} items", app.list.len());
    result.context("事件循环异常退出")
}

/// 切换到备用屏幕并创建终端
fn setup_terminal<W: Write>(mut writer: W) -> io::Result<Terminal<CrosstermBackend<W>>> {
    execute!(writer, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(writer))
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let mut drawn = None;
    loop {
        // 清单或界面状态变化时才重绘
        let stamp = (
            app.list.revision(),
            app.selected_index,
            app.mode(),
            app.add_field,
            app.edit.clone(),
            app.message.clone(),
        );
        if drawn.as_ref() != Some(&stamp) {
            terminal.draw(|f| render(f, app))?;
            drawn = Some(stamp);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if ui::handle_key_event(app, key.code)? {
                    break;
                }
            }
            Event::Resize(_, _) => drawn = None,
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_setup_terminal_reports_write_failure() {
        let err = setup_terminal(BrokenPipe).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
