//! App 状态定义 (Model)
//!
//! 清单本身的状态在 `ShoppingList` 中；这里只保存界面相关的状态

use crate::config::UiConfig;
use crate::models::{Item, ShoppingList};

/// 应用状态
pub struct App {
    pub list: ShoppingList,
    pub selected_index: usize,
    pub add_field: InputField, // 添加对话框中的焦点字段
    pub edit: EditBuffer,
    pub pending: Option<ConfirmAction>,
    pub message: Option<String>,
    pub settings: UiConfig,
}

/// 应用模式，由清单状态推导
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    AddingItem,
    EditingItem(u32),
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Delete(u32),
}

/// 输入字段类型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputField {
    #[default]
    Name,
    Quantity,
}

impl InputField {
    pub fn toggle(self) -> Self {
        match self {
            InputField::Name => InputField::Quantity,
            InputField::Quantity => InputField::Name,
        }
    }
}

/// 行内编辑器的输入缓冲
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBuffer {
    pub name: String,
    pub quantity: String,
    pub field: InputField,
}

impl EditBuffer {
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            field: InputField::Name,
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        match self.field {
            InputField::Name => &mut self.name,
            InputField::Quantity => &mut self.quantity,
        }
    }
}

impl App {
    /// 创建新的应用实例
    pub fn new(list: ShoppingList, settings: UiConfig) -> Self {
        Self {
            list,
            selected_index: 0,
            add_field: InputField::Name,
            edit: EditBuffer::default(),
            pending: None,
            message: None,
            settings,
        }
    }

    /// 当前模式
    pub fn mode(&self) -> AppMode {
        if let Some(action) = &self.pending {
            AppMode::Confirm(action.clone())
        } else if self.list.dialog_open() {
            AppMode::AddingItem
        } else if let Some(id) = self.list.editing_id() {
            AppMode::EditingItem(id)
        } else {
            AppMode::Normal
        }
    }

    /// 保证选中索引有效
    pub fn clamp_selection(&mut self) {
        let len = self.list.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// 获取当前选中的条目
    pub fn selected_item(&self) -> Option<&Item> {
        self.list.items().get(self.selected_index)
    }

    pub fn selected_item_id(&self) -> Option<u32> {
        self.selected_item().map(|item| item.id)
    }
}
