use super::{date, opt_text, parse_col, parse_opt_col, text, ExpenseRepository};
use crate::repository::{ProjectScoped, Record};
use organizer_types::{
    now_millis, ChecklistItemId, Expense, ExpenseCategory, ExpenseCategoryId, ExpenseId, Money,
    ProjectId,
};
use rusqlite::params;
use rusqlite::types::Value;
use rusqlite::Row;
use std::collections::BTreeMap;

impl Record for ExpenseCategory {
    type Id = ExpenseCategoryId;

    const TABLE: &'static str = "expense_categories";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "name",
        "color",
        "sort_order",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "sort_order ASC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name"];

    fn id(&self) -> ExpenseCategoryId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            text(&self.name),
            opt_text(self.color.as_ref()),
            Value::Integer(self.sort_order),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ExpenseCategory {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            name: row.get(2)?,
            color: row.get(3)?,
            sort_order: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl ProjectScoped for ExpenseCategory {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl Record for Expense {
    type Id = ExpenseId;

    const TABLE: &'static str = "expenses";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "project_id",
        "category_id",
        "checklist_item_id",
        "title",
        "vendor",
        "notes",
        "amount_minor",
        "currency",
        "spent_on",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "spent_on DESC, created_at ASC";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "vendor", "notes"];

    fn id(&self) -> ExpenseId {
        self.id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id),
            text(self.project_id),
            opt_text(self.category_id),
            opt_text(self.checklist_item_id),
            text(&self.title),
            opt_text(self.vendor.as_ref()),
            opt_text(self.notes.as_ref()),
            Value::Integer(self.amount.minor_units),
            text(&self.amount.currency),
            date(self.spent_on),
            Value::Integer(self.created_at),
            Value::Integer(self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Expense {
            id: parse_col(row, 0)?,
            project_id: parse_col(row, 1)?,
            category_id: parse_opt_col(row, 2)?,
            checklist_item_id: parse_opt_col::<ChecklistItemId>(row, 3)?,
            title: row.get(4)?,
            vendor: row.get(5)?,
            notes: row.get(6)?,
            amount: Money {
                minor_units: row.get(7)?,
                currency: row.get(8)?,
            },
            spent_on: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl ProjectScoped for Expense {
    fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

impl ExpenseRepository {
    pub fn fetch_by_category_id(&self, category_id: &ExpenseCategoryId) -> Vec<Expense> {
        self.fetch_where("fetch_by_category_id", "category_id", category_id.to_string())
    }

    /// Sum of a project's expenses per currency, in minor units.
    pub fn totals_by_currency(&self, project_id: &ProjectId) -> BTreeMap<String, i64> {
        self.read_mapped(
            "totals_by_currency",
            "SELECT currency, SUM(amount_minor) FROM expenses WHERE project_id = ?1 GROUP BY currency",
            params![project_id.to_string()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .into_iter()
        .collect()
    }

    /// Clear `category_id` on every expense pointing at a category that is
    /// about to be deleted on its own.
    pub fn detach_category(&self, category_id: &ExpenseCategoryId) -> bool {
        self.write(
            "detach_category",
            "UPDATE expenses SET category_id = NULL, updated_at = ?1 WHERE category_id = ?2",
            params![now_millis(), category_id.to_string()],
        )
        .is_some()
    }
}
