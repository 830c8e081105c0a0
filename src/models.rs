use serde::{Deserialize, Serialize};

use crate::error::{InputError, parse_quantity};

/// 购物清单条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub quantity: u32,
}

impl Item {
    pub fn new(id: u32, name: String, quantity: u32) -> Self {
        Self { id, name, quantity }
    }
}

/// 添加对话框中数量无法解析时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidQuantityPolicy {
    #[default]
    Reject, // 拒绝添加并报告错误
    Zero, // 按数量 0 添加
}

/// 清单状态：条目 + 对话框草稿 + 编辑标记
///
/// 只在内存中存在，随界面会话创建和丢弃。每次状态变化 `revision` 加一，
/// 渲染层可以据此判断是否需要重绘。
#[derive(Debug, Clone)]
pub struct ShoppingList {
    items: Vec<Item>,
    next_id: u32,
    editing: Option<u32>, // 至多一个条目处于编辑状态
    dialog_open: bool,
    draft_name: String,
    draft_quantity: String,
    quantity_policy: InvalidQuantityPolicy,
    revision: u64,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::with_policy(InvalidQuantityPolicy::default())
    }

    pub fn with_policy(quantity_policy: InvalidQuantityPolicy) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            editing: None,
            dialog_open: false,
            draft_name: String::new(),
            draft_quantity: String::new(),
            quantity_policy,
            revision: 0,
        }
    }

    // ============ 只读访问 ============

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn editing_id(&self) -> Option<u32> {
        self.editing
    }

    pub fn is_editing(&self, id: u32) -> bool {
        self.editing == Some(id)
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn draft_name(&self) -> &str {
        &self.draft_name
    }

    pub fn draft_quantity(&self) -> &str {
        &self.draft_quantity
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ============ 添加对话框 ============

    /// 打开添加对话框
    pub fn open_add_dialog(&mut self) {
        self.dialog_open = true;
        self.touch();
    }

    /// 取消添加，清空草稿
    pub fn cancel_add_dialog(&mut self) {
        self.close_dialog();
        log::debug!("add dialog cancelled");
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft_name = name.into();
        self.touch();
    }

    pub fn set_draft_quantity(&mut self, quantity: impl Into<String>) {
        self.draft_quantity = quantity.into();
        self.touch();
    }

    /// 提交添加对话框
    ///
    /// 名称为空白时静默忽略，返回 `Ok(None)`。数量无法解析时按 `quantity_policy`
    /// 处理：`Reject` 返回错误且不添加，`Zero` 以数量 0 添加。
    /// 无论结果如何，对话框都会关闭并清空草稿。
    pub fn commit_add_dialog(&mut self) -> Result<Option<u32>, InputError> {
        let result = self.add_from_drafts();
        self.close_dialog();
        result
    }

    fn add_from_drafts(&mut self) -> Result<Option<u32>, InputError> {
        if self.draft_name.trim().is_empty() {
            log::debug!("blank item name ignored");
            return Ok(None);
        }

        let quantity = match parse_quantity(&self.draft_quantity) {
            Ok(quantity) => quantity,
            Err(err) => match self.quantity_policy {
                InvalidQuantityPolicy::Reject => {
                    log::warn!("add rejected: {err}");
                    return Err(err);
                }
                InvalidQuantityPolicy::Zero => {
                    log::warn!("{err}, defaulting to 0");
                    0
                }
            },
        };

        let id = self.next_id;
        self.next_id += 1;
        self.items
            .push(Item::new(id, self.draft_name.clone(), quantity));
        log::info!("added item {id} '{}' x{quantity}", self.draft_name);
        Ok(Some(id))
    }

    fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.draft_name.clear();
        self.draft_quantity.clear();
        self.touch();
    }

    // ============ 编辑 ============

    /// 进入编辑模式；其它条目的编辑状态被清除。id 不存在时不做任何事
    pub fn begin_edit(&mut self, id: u32) {
        if self.get(id).is_some() {
            self.editing = Some(id);
            self.touch();
        }
    }

    /// 结束编辑并写回修改
    ///
    /// 总是清除编辑状态。数量无法解析时保留原数量，只更新名称。
    pub fn complete_edit(&mut self, id: u32, new_name: &str, new_quantity: &str) {
        self.editing = None;
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.name = new_name.to_string();
            match parse_quantity(new_quantity) {
                Ok(quantity) => item.quantity = quantity,
                Err(err) => log::debug!("{err}, keeping quantity {}", item.quantity),
            }
            log::info!("updated item {id} '{}' x{}", item.name, item.quantity);
        }
        self.touch();
    }

    /// 放弃编辑：只清除编辑状态，条目保持不变
    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.editing.take() {
            log::debug!("edit of item {id} discarded");
            self.touch();
        }
    }

    // ============ 删除 ============

    /// 删除条目，返回被删除的条目。剩余条目保持原有顺序和 id
    pub fn delete_item(&mut self, id: u32) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(index);
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.touch();
        log::info!("deleted item {id} '{}'", removed.name);
        Some(removed)
    }
}

impl Default for ShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(list: &mut ShoppingList, name: &str, quantity: &str) -> Result<Option<u32>, InputError> {
        list.open_add_dialog();
        list.set_draft_name(name);
        list.set_draft_quantity(quantity);
        list.commit_add_dialog()
    }

    fn editing_count(list: &ShoppingList) -> usize {
        list.items()
            .iter()
            .filter(|item| list.is_editing(item.id))
            .count()
    }

    #[test]
    fn test_add_items_get_increasing_ids() {
        let mut list = ShoppingList::new();
        let mut last = 0;
        for (i, name) in ["Milk", "Eggs", "Bread", "Tea"].iter().enumerate() {
            let id = add(&mut list, name, "1").unwrap().unwrap();
            assert!(id > last);
            last = id;
            assert_eq!(list.len(), i + 1);
        }
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let mut list = ShoppingList::new();
        add(&mut list, "Milk", "2").unwrap();

        assert_eq!(add(&mut list, "", "5"), Ok(None));
        assert_eq!(add(&mut list, "   ", "5"), Ok(None));
        // 名称为空时不校验数量
        assert_eq!(add(&mut list, "", "abc"), Ok(None));

        assert_eq!(list.len(), 1);
        assert!(!list.dialog_open());
        assert!(list.draft_name().is_empty());
        assert!(list.draft_quantity().is_empty());
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let mut list = ShoppingList::new();
        let err = add(&mut list, "Milk", "two").unwrap_err();
        assert!(matches!(err, InputError::InvalidQuantity { .. }));
        assert!(list.is_empty());
        assert!(!list.dialog_open());
        assert!(list.draft_name().is_empty());
    }

    #[test]
    fn test_invalid_quantity_defaults_to_zero() {
        let mut list = ShoppingList::with_policy(InvalidQuantityPolicy::Zero);
        let id = add(&mut list, "Milk", "two").unwrap().unwrap();
        assert_eq!(list.get(id).unwrap().quantity, 0);
    }

    #[test]
    fn test_cancel_clears_drafts() {
        let mut list = ShoppingList::new();
        list.open_add_dialog();
        list.set_draft_name("Milk");
        list.set_draft_quantity("3");
        list.cancel_add_dialog();

        assert!(!list.dialog_open());
        assert!(list.draft_name().is_empty());
        assert!(list.draft_quantity().is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn test_single_editing_item() {
        let mut list = ShoppingList::new();
        let x = add(&mut list, "Milk", "1").unwrap().unwrap();
        let y = add(&mut list, "Eggs", "12").unwrap().unwrap();

        list.begin_edit(x);
        list.begin_edit(y);
        assert!(list.is_editing(y));
        assert!(!list.is_editing(x));
        assert_eq!(editing_count(&list), 1);

        // 未知 id 不影响当前编辑状态
        list.begin_edit(99);
        assert_eq!(list.editing_id(), Some(y));
    }

    #[test]
    fn test_complete_edit_always_clears_editing() {
        let mut list = ShoppingList::new();
        let id = add(&mut list, "Milk", "1").unwrap().unwrap();

        list.begin_edit(id);
        list.complete_edit(42, "Ghost", "7");
        assert_eq!(list.editing_id(), None);
        assert_eq!(list.get(id).unwrap().name, "Milk");

        list.begin_edit(id);
        list.complete_edit(id, "Oat milk", "4");
        assert_eq!(editing_count(&list), 0);
        assert_eq!(list.get(id).unwrap(), &Item::new(id, "Oat milk".into(), 4));
    }

    #[test]
    fn test_complete_edit_keeps_quantity_on_bad_input() {
        let mut list = ShoppingList::new();
        let id = add(&mut list, "Milk", "2").unwrap().unwrap();

        list.begin_edit(id);
        list.complete_edit(id, "Butter", "notanumber");
        let item = list.get(id).unwrap();
        assert_eq!(item.name, "Butter");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_cancel_edit_leaves_item_unchanged() {
        let mut list = ShoppingList::new();
        let id = add(&mut list, "Milk", "2").unwrap().unwrap();
        list.begin_edit(id);

        let before = list.revision();
        list.cancel_edit();
        assert_eq!(list.editing_id(), None);
        assert!(list.revision() > before);
        assert_eq!(list.get(id).unwrap(), &Item::new(id, "Milk".into(), 2));

        // 未处于编辑状态时不产生变化
        let before = list.revision();
        list.cancel_edit();
        assert_eq!(list.revision(), before);
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut list = ShoppingList::new();
        let a = add(&mut list, "A", "1").unwrap().unwrap();
        let b = add(&mut list, "B", "1").unwrap().unwrap();
        let c = add(&mut list, "C", "1").unwrap().unwrap();

        let removed = list.delete_item(b).unwrap();
        assert_eq!(removed.name, "B");
        let ids: Vec<u32> = list.items().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![a, c]);

        assert!(list.delete_item(b).is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut list = ShoppingList::new();
        let a = add(&mut list, "A", "1").unwrap().unwrap();
        let b = add(&mut list, "B", "1").unwrap().unwrap();
        list.delete_item(a);
        let c = add(&mut list, "C", "1").unwrap().unwrap();

        assert_ne!(c, b);
        assert_ne!(c, a);
    }

    #[test]
    fn test_delete_editing_item_clears_editing() {
        let mut list = ShoppingList::new();
        let id = add(&mut list, "Milk", "1").unwrap().unwrap();
        list.begin_edit(id);
        list.delete_item(id);
        assert_eq!(list.editing_id(), None);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut list = ShoppingList::new();
        let start = list.revision();
        list.open_add_dialog();
        assert!(list.revision() > start);

        let before = list.revision();
        list.delete_item(7);
        assert_eq!(list.revision(), before);
    }

    #[test]
    fn test_scenario() {
        let mut list = ShoppingList::new();

        add(&mut list, "Milk", "2").unwrap();
        assert_eq!(list.items(), &[Item::new(1, "Milk".into(), 2)]);

        add(&mut list, "", "5").unwrap();
        assert_eq!(list.len(), 1);

        list.begin_edit(1);
        list.complete_edit(1, "Milk", "3");
        assert_eq!(list.items(), &[Item::new(1, "Milk".into(), 3)]);

        list.delete_item(1);
        assert!(list.is_empty());
    }
}
