//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑；所有清单修改都经由 `ShoppingList` 的操作完成

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, EditBuffer, InputField};

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        let mode = self.mode();
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            // 只在普通模式下生效，避免编辑状态残留在对话框下面
            Action::OpenAddDialog | Action::StartEdit | Action::DeleteSelected
                if mode != AppMode::Normal => {}
            Action::OpenAddDialog => self.open_add_dialog(),
            Action::StartEdit => self.start_edit(),
            Action::DeleteSelected => self.start_delete(),

            Action::Cancel => match mode {
                AppMode::AddingItem => self.list.cancel_add_dialog(),
                AppMode::EditingItem(_) => self.cancel_edit(),
                AppMode::Confirm(_) => self.pending = None,
                AppMode::Normal => self.message = None,
            },

            Action::Submit => match mode {
                AppMode::AddingItem => self.commit_add(),
                AppMode::EditingItem(id) => self.save_edit(id),
                AppMode::Confirm(action) => self.execute_confirm(action),
                AppMode::Normal => {}
            },

            Action::NextField => match mode {
                AppMode::AddingItem => self.add_field = self.add_field.toggle(),
                AppMode::EditingItem(_) => self.edit.field = self.edit.field.toggle(),
                _ => {}
            },

            Action::Input(c) => self.edit_focused_text(&mode, |text| text.push(c)),
            Action::DeleteChar => self.edit_focused_text(&mode, |text| {
                text.pop();
            }),
        }
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.list.len() {
            self.selected_index += 1;
        }
    }

    // ============ 添加相关 ============

    pub fn open_add_dialog(&mut self) {
        self.add_field = InputField::Name;
        self.message = None;
        self.list.open_add_dialog();
    }

    /// 提交添加对话框
    pub fn commit_add(&mut self) {
        match self.list.commit_add_dialog() {
            Ok(Some(id)) => {
                self.selected_index = self.list.len() - 1;
                if let Some(item) = self.list.get(id) {
                    self.message = Some(format!("已添加 {}", item.name));
                }
            }
            Ok(None) => {}
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    /// 修改当前焦点输入框的文本
    fn edit_focused_text(&mut self, mode: &AppMode, edit: impl FnOnce(&mut String)) {
        match mode {
            AppMode::AddingItem => match self.add_field {
                InputField::Name => {
                    let mut text = self.list.draft_name().to_string();
                    edit(&mut text);
                    self.list.set_draft_name(text);
                }
                InputField::Quantity => {
                    let mut text = self.list.draft_quantity().to_string();
                    edit(&mut text);
                    self.list.set_draft_quantity(text);
                }
            },
            AppMode::EditingItem(_) => edit(self.edit.focused_mut()),
            _ => {}
        }
    }

    // ============ 编辑相关 ============

    /// 开始编辑选中的条目
    pub fn start_edit(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let id = item.id;
        self.edit = EditBuffer::from_item(item);
        self.list.begin_edit(id);
        self.message = None;
    }

    /// 保存编辑
    pub fn save_edit(&mut self, id: u32) {
        let edit = std::mem::take(&mut self.edit);
        self.list.complete_edit(id, &edit.name, &edit.quantity);
        self.message = Some("已保存".to_string());
    }

    /// 放弃编辑，条目不做修改
    pub fn cancel_edit(&mut self) {
        self.edit = EditBuffer::default();
        self.list.cancel_edit();
    }

    // ============ 删除相关 ============

    /// 删除选中条目，根据设置先请求确认
    pub fn start_delete(&mut self) {
        if let Some(id) = self.selected_item_id() {
            if self.settings.confirm_delete {
                self.pending = Some(ConfirmAction::Delete(id));
            } else {
                self.delete_item(id);
            }
        }
    }

    pub fn delete_item(&mut self, id: u32) {
        if let Some(item) = self.list.delete_item(id) {
            self.message = Some(format!("已删除 {}", item.name));
        }
        self.clamp_selection();
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self, action: ConfirmAction) {
        self.pending = None;
        match action {
            ConfirmAction::Delete(id) => self.delete_item(id),
        }
    }
}
