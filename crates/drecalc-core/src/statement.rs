//! Period aggregation and the income statement (DRE) lines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Account, AccountRegistry, LedgerEntry};
use crate::period::DateRange;
use crate::types::Category;

/// Computed income statement for one company and date window.
///
/// Derived on demand, never stored; identical inputs always produce an
/// identical statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub company_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub gross_revenue: f64,
    pub deductions: f64,
    pub net_revenue: f64,
    pub cost_of_goods: f64,
    pub gross_profit: f64,
    pub commercial_expenses: f64,
    pub administrative_expenses: f64,
    pub other_operating_expenses: f64,
    pub operating_expenses: f64,
    pub operating_result: f64,
    pub financial_income: f64,
    pub financial_expenses: f64,
    pub financial_result: f64,
    pub result_before_tax: f64,
    pub income_tax: f64,
    pub net_income: f64,
    /// Percent of net revenue; 0 whenever net revenue is not positive.
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,
}

/// What the aggregator scanned and what it had to skip.
///
/// Entries whose account id resolves to nothing are dropped from every total
/// without raising an error; their ids land here so integrators can reconcile
/// counts and detect data drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateDiagnostics {
    /// Entries that passed the company and window filter.
    pub scanned: usize,
    /// Ids of in-window entries with an unresolvable account reference.
    pub skipped: Vec<String>,
}

/// Net signed total per category for one company inside a window.
///
/// Categories with no matching entries are absent from the map; readers treat
/// them as zero. Analytic and Synthetic accounts are summed alike.
pub fn aggregate_by_category(
    entries: &[LedgerEntry],
    registry: &AccountRegistry<'_>,
    company_id: &str,
    range: DateRange,
) -> (HashMap<Category, f64>, AggregateDiagnostics) {
    let mut totals: HashMap<Category, f64> = HashMap::new();
    let mut diagnostics = AggregateDiagnostics::default();

    for entry in entries {
        if entry.company_id != company_id || !range.contains(entry.date) {
            continue;
        }
        diagnostics.scanned += 1;

        let Some(account) = registry.get(&entry.account_id) else {
            diagnostics.skipped.push(entry.id.clone());
            continue;
        };

        let value = entry
            .entry_type
            .signed_amount(entry.amount, account.category.is_revenue());
        *totals.entry(account.category).or_insert(0.0) += value;
    }

    if !diagnostics.skipped.is_empty() {
        log::warn!(
            "{} of {} entries in {} reference unknown accounts and were skipped",
            diagnostics.skipped.len(),
            diagnostics.scanned,
            range
        );
    }

    (totals, diagnostics)
}

/// Compute the income statement for `company_id` over `range`.
pub fn calculate(
    entries: &[LedgerEntry],
    accounts: &[Account],
    company_id: &str,
    range: DateRange,
) -> Statement {
    calculate_with_diagnostics(entries, accounts, company_id, range).0
}

/// Same as [`calculate`], additionally returning the skip diagnostics.
pub fn calculate_with_diagnostics(
    entries: &[LedgerEntry],
    accounts: &[Account],
    company_id: &str,
    range: DateRange,
) -> (Statement, AggregateDiagnostics) {
    let registry = AccountRegistry::new(accounts);
    let (totals, diagnostics) = aggregate_by_category(entries, &registry, company_id, range);
    let total = |category: Category| totals.get(&category).copied().unwrap_or(0.0);

    let gross_revenue = total(Category::GrossRevenue);
    let deductions = total(Category::RevenueDeductions);
    let net_revenue = gross_revenue - deductions;

    let cost_of_goods = total(Category::CostOfGoodsSold);
    let gross_profit = net_revenue - cost_of_goods;

    let commercial_expenses = total(Category::CommercialExpenses);
    let administrative_expenses = total(Category::AdministrativeExpenses);
    let other_operating_expenses = total(Category::OtherOperatingExpenses);
    let operating_expenses =
        commercial_expenses + administrative_expenses + other_operating_expenses;
    let operating_result = gross_profit - operating_expenses;

    let financial_income = total(Category::FinancialIncome);
    let financial_expenses = total(Category::FinancialExpenses);
    let financial_result = financial_income - financial_expenses;

    let result_before_tax = operating_result + financial_result;
    let income_tax = total(Category::IncomeTaxExpenses);
    let net_income = result_before_tax - income_tax;

    let margin = |value: f64| {
        if net_revenue > 0.0 {
            value / net_revenue * 100.0
        } else {
            0.0
        }
    };

    log::debug!(
        "statement {} {}: net_revenue={} operating_result={} net_income={}",
        company_id,
        range,
        net_revenue,
        operating_result,
        net_income
    );

    let statement = Statement {
        company_id: company_id.to_string(),
        start_date: range.start,
        end_date: range.end,
        gross_revenue,
        deductions,
        net_revenue,
        cost_of_goods,
        gross_profit,
        commercial_expenses,
        administrative_expenses,
        other_operating_expenses,
        operating_expenses,
        operating_result,
        financial_income,
        financial_expenses,
        financial_result,
        result_before_tax,
        income_tax,
        net_income,
        gross_margin: margin(gross_profit),
        operating_margin: margin(operating_result),
        net_margin: margin(net_income),
    };
    (statement, diagnostics)
}

/// Net cost of one account inside a window, for drill-down views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTotal {
    pub account_id: String,
    pub name: String,
    pub category: Category,
    pub total: f64,
}

/// Per-account totals over the window, restricted to non-revenue categories.
///
/// Accounts whose net total is zero or negative are dropped; the result is
/// sorted by total descending (it feeds "top cost contributors" views, not a
/// general ledger report).
pub fn aggregate_by_account(
    entries: &[LedgerEntry],
    accounts: &[Account],
    company_id: &str,
    range: DateRange,
) -> Vec<AccountTotal> {
    let registry = AccountRegistry::new(accounts);
    let mut totals: HashMap<&str, AccountTotal> = HashMap::new();

    for entry in entries {
        if entry.company_id != company_id || !range.contains(entry.date) {
            continue;
        }
        let Some(account) = registry.get(&entry.account_id) else {
            continue;
        };
        if account.category.is_revenue() {
            continue;
        }

        let value = entry.entry_type.signed_amount(entry.amount, false);
        totals
            .entry(account.id.as_str())
            .or_insert_with(|| AccountTotal {
                account_id: account.id.clone(),
                name: account.name.clone(),
                category: account.category,
                total: 0.0,
            })
            .total += value;
    }

    let mut result: Vec<AccountTotal> = totals
        .into_values()
        .filter(|account| account.total > 0.0)
        .collect();
    result.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    result
}

/// Relative change between two computed statements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodDelta {
    /// Net revenue change in percent of the previous period.
    pub revenue_change_pct: f64,
    /// Net income change in percent of the previous period.
    pub net_income_change_pct: f64,
    /// Net margin difference in percentage points, not a relative change.
    pub net_margin_change_pts: f64,
}

/// Period-over-period deltas.
///
/// Relative changes divide by the previous value's magnitude and are 0 when
/// the previous value is 0. The sign of the previous value is not otherwise
/// special-cased, so a swing across zero produces a large-magnitude percent.
pub fn compare(previous: &Statement, current: &Statement) -> PeriodDelta {
    let relative = |prev: f64, cur: f64| {
        if prev == 0.0 {
            0.0
        } else {
            (cur - prev) / prev.abs() * 100.0
        }
    };

    PeriodDelta {
        revenue_change_pct: relative(previous.net_revenue, current.net_revenue),
        net_income_change_pct: relative(previous.net_income, current.net_income),
        net_margin_change_pts: current.net_margin - previous.net_margin,
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountKind;
    use crate::types::EntryType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn account(id: &str, name: &str, category: Category) -> Account {
        Account {
            id: id.to_string(),
            code: String::new(),
            name: name.to_string(),
            category,
            kind: AccountKind::Analytic,
            active: true,
        }
    }

    fn entry(
        id: &str,
        company: &str,
        account: &str,
        day: NaiveDate,
        amount: f64,
        entry_type: EntryType,
    ) -> LedgerEntry {
        LedgerEntry {
            id: id.to_string(),
            company_id: company.to_string(),
            account_id: account.to_string(),
            date: day,
            description: String::new(),
            amount,
            entry_type,
        }
    }

    fn january() -> DateRange {
        DateRange::new(date(2024, 1, 1), date(2024, 1, 31))
    }

    fn basic_accounts() -> Vec<Account> {
        vec![
            account("a1", "Vendas balcão", Category::GrossRevenue),
            account("a2", "Escritório", Category::AdministrativeExpenses),
        ]
    }

    #[test]
    fn test_basic_statement() {
        let accounts = basic_accounts();
        let entries = vec![
            entry("e1", "c1", "a1", date(2024, 1, 10), 1000.0, EntryType::Credit),
            entry("e2", "c1", "a2", date(2024, 1, 15), 400.0, EntryType::Debit),
        ];

        let statement = calculate(&entries, &accounts, "c1", january());
        assert_eq!(statement.gross_revenue, 1000.0);
        assert_eq!(statement.net_revenue, 1000.0);
        assert_eq!(statement.operating_expenses, 400.0);
        assert_eq!(statement.operating_result, 600.0);
        assert_eq!(statement.net_income, 600.0);
        assert_eq!(statement.net_margin, 60.0);
    }

    #[test]
    fn test_revenue_reversal_goes_negative() {
        let accounts = basic_accounts();
        let entries = vec![entry(
            "e1",
            "c1",
            "a1",
            date(2024, 2, 1),
            500.0,
            EntryType::Debit,
        )];

        let february = DateRange::new(date(2024, 2, 1), date(2024, 2, 29));
        let statement = calculate(&entries, &accounts, "c1", february);
        assert_eq!(statement.gross_revenue, -500.0);
        assert_eq!(statement.net_income, -500.0);
        // Negative net revenue: margins stay 0 rather than going undefined.
        assert_eq!(statement.net_margin, 0.0);
    }

    #[test]
    fn test_empty_window_is_all_zero() {
        let statement = calculate(&[], &basic_accounts(), "c1", january());
        assert_eq!(statement.gross_revenue, 0.0);
        assert_eq!(statement.net_revenue, 0.0);
        assert_eq!(statement.net_income, 0.0);
        assert_eq!(statement.gross_margin, 0.0);
        assert_eq!(statement.operating_margin, 0.0);
        assert_eq!(statement.net_margin, 0.0);
    }

    #[test]
    fn test_sign_convention_round_trip() {
        let accounts = basic_accounts();
        let entries = vec![
            // Equal credit and debit on a revenue account cancel out,
            entry("e1", "c1", "a1", date(2024, 1, 5), 250.0, EntryType::Credit),
            entry("e2", "c1", "a1", date(2024, 1, 6), 250.0, EntryType::Debit),
            // and the same pair on an expense account cancels too.
            entry("e3", "c1", "a2", date(2024, 1, 7), 80.0, EntryType::Debit),
            entry("e4", "c1", "a2", date(2024, 1, 8), 80.0, EntryType::Credit),
        ];

        let statement = calculate(&entries, &accounts, "c1", january());
        assert_eq!(statement.gross_revenue, 0.0);
        assert_eq!(statement.administrative_expenses, 0.0);
    }

    #[test]
    fn test_negative_amount_flips_entry_type() {
        let accounts = basic_accounts();
        let negative_credit = vec![entry(
            "e1",
            "c1",
            "a1",
            date(2024, 1, 5),
            -300.0,
            EntryType::Credit,
        )];
        let positive_debit = vec![entry(
            "e1",
            "c1",
            "a1",
            date(2024, 1, 5),
            300.0,
            EntryType::Debit,
        )];

        let from_negative = calculate(&negative_credit, &accounts, "c1", january());
        let from_flipped = calculate(&positive_debit, &accounts, "c1", january());
        assert_eq!(from_negative.gross_revenue, -300.0);
        assert_eq!(from_negative.gross_revenue, from_flipped.gross_revenue);
    }

    #[test]
    fn test_unresolved_account_skipped_with_diagnostics() {
        let accounts = basic_accounts();
        let entries = vec![
            entry("e1", "c1", "a1", date(2024, 1, 10), 100.0, EntryType::Credit),
            entry("e2", "c1", "ghost", date(2024, 1, 11), 9999.0, EntryType::Debit),
        ];

        let (statement, diagnostics) =
            calculate_with_diagnostics(&entries, &accounts, "c1", january());
        assert_eq!(statement.gross_revenue, 100.0);
        assert_eq!(statement.net_income, 100.0);
        assert_eq!(diagnostics.scanned, 2);
        assert_eq!(diagnostics.skipped, vec!["e2".to_string()]);
    }

    #[test]
    fn test_company_and_window_filters() {
        let accounts = basic_accounts();
        let entries = vec![
            entry("e1", "c1", "a1", date(2024, 1, 10), 100.0, EntryType::Credit),
            entry("e2", "other", "a1", date(2024, 1, 10), 100.0, EntryType::Credit),
            entry("e3", "c1", "a1", date(2024, 2, 1), 100.0, EntryType::Credit),
        ];

        let statement = calculate(&entries, &accounts, "c1", january());
        assert_eq!(statement.gross_revenue, 100.0);
    }

    #[test]
    fn test_inverted_range_yields_zero_statement() {
        let accounts = basic_accounts();
        let entries = vec![entry(
            "e1",
            "c1",
            "a1",
            date(2024, 1, 10),
            100.0,
            EntryType::Credit,
        )];

        let inverted = DateRange::new(date(2024, 1, 31), date(2024, 1, 1));
        let statement = calculate(&entries, &accounts, "c1", inverted);
        assert_eq!(statement.gross_revenue, 0.0);
        assert_eq!(statement.net_margin, 0.0);
    }

    #[test]
    fn test_synthetic_accounts_aggregate_like_analytic() {
        let mut accounts = basic_accounts();
        accounts.push(Account {
            id: "a3".to_string(),
            code: String::new(),
            name: "Despesas gerais".to_string(),
            category: Category::AdministrativeExpenses,
            kind: AccountKind::Synthetic,
            active: false,
        });
        let entries = vec![
            entry("e1", "c1", "a2", date(2024, 1, 10), 50.0, EntryType::Debit),
            entry("e2", "c1", "a3", date(2024, 1, 11), 70.0, EntryType::Debit),
        ];

        let statement = calculate(&entries, &accounts, "c1", january());
        assert_eq!(statement.administrative_expenses, 120.0);
    }

    #[test]
    fn test_decomposition_identities() {
        let accounts = vec![
            account("r", "Receita", Category::GrossRevenue),
            account("d", "Impostos sobre vendas", Category::RevenueDeductions),
            account("g", "Insumos", Category::CostOfGoodsSold),
            account("cm", "Comissões", Category::CommercialExpenses),
            account("ad", "Escritório", Category::AdministrativeExpenses),
            account("ot", "Diversos", Category::OtherOperatingExpenses),
            account("fi", "Rendimentos", Category::FinancialIncome),
            account("fe", "Juros", Category::FinancialExpenses),
            account("ir", "IRPJ", Category::IncomeTaxExpenses),
        ];
        let entries = vec![
            entry("e1", "c1", "r", date(2024, 1, 2), 5000.0, EntryType::Credit),
            entry("e2", "c1", "d", date(2024, 1, 3), 600.0, EntryType::Debit),
            entry("e3", "c1", "g", date(2024, 1, 4), 1500.0, EntryType::Debit),
            entry("e4", "c1", "cm", date(2024, 1, 5), 300.0, EntryType::Debit),
            entry("e5", "c1", "ad", date(2024, 1, 6), 700.0, EntryType::Debit),
            entry("e6", "c1", "ot", date(2024, 1, 7), 100.0, EntryType::Debit),
            entry("e7", "c1", "fi", date(2024, 1, 8), 50.0, EntryType::Credit),
            entry("e8", "c1", "fe", date(2024, 1, 9), 120.0, EntryType::Debit),
            entry("e9", "c1", "ir", date(2024, 1, 10), 200.0, EntryType::Debit),
        ];

        let s = calculate(&entries, &accounts, "c1", january());
        assert_eq!(s.net_revenue, s.gross_revenue - s.deductions);
        assert_eq!(s.gross_profit, s.net_revenue - s.cost_of_goods);
        assert_eq!(
            s.operating_expenses,
            s.commercial_expenses + s.administrative_expenses + s.other_operating_expenses
        );
        assert_eq!(s.operating_result, s.gross_profit - s.operating_expenses);
        assert_eq!(s.financial_result, s.financial_income - s.financial_expenses);
        assert_eq!(s.result_before_tax, s.operating_result + s.financial_result);
        assert_eq!(s.net_income, s.result_before_tax - s.income_tax);
        assert_eq!(s.net_income, 1530.0);
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let accounts = basic_accounts();
        let entries = vec![
            entry("e1", "c1", "a1", date(2024, 1, 3), 123.45, EntryType::Credit),
            entry("e2", "c1", "a2", date(2024, 1, 4), 67.89, EntryType::Debit),
        ];

        let first = calculate(&entries, &accounts, "c1", january());
        let second = calculate(&entries, &accounts, "c1", january());
        assert_eq!(first, second);
    }

    #[test]
    fn test_breakdown_filters_and_sorts() {
        let accounts = vec![
            account("r", "Vendas", Category::GrossRevenue),
            account("x", "Aluguel", Category::AdministrativeExpenses),
            account("y", "Marketing", Category::CommercialExpenses),
            account("z", "Estorno", Category::OtherOperatingExpenses),
        ];
        let entries = vec![
            // Revenue accounts never show up in the breakdown.
            entry("e1", "c1", "r", date(2024, 1, 2), 900.0, EntryType::Credit),
            entry("e2", "c1", "x", date(2024, 1, 3), 500.0, EntryType::Debit),
            entry("e3", "c1", "y", date(2024, 1, 4), 800.0, EntryType::Debit),
            // Net total <= 0 is discarded.
            entry("e4", "c1", "z", date(2024, 1, 5), 100.0, EntryType::Debit),
            entry("e5", "c1", "z", date(2024, 1, 6), 150.0, EntryType::Credit),
        ];

        let breakdown = aggregate_by_account(&entries, &accounts, "c1", january());
        let names: Vec<&str> = breakdown.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Marketing", "Aluguel"]);
        assert_eq!(breakdown[0].total, 800.0);
        assert_eq!(breakdown[1].total, 500.0);
    }

    #[test]
    fn test_compare_deltas() {
        let accounts = basic_accounts();
        let previous_entries = vec![
            entry("e1", "c1", "a1", date(2024, 1, 5), 1000.0, EntryType::Credit),
            entry("e2", "c1", "a2", date(2024, 1, 6), 500.0, EntryType::Debit),
        ];
        let current_entries = vec![
            entry("e3", "c1", "a1", date(2024, 2, 5), 1200.0, EntryType::Credit),
            entry("e4", "c1", "a2", date(2024, 2, 6), 450.0, EntryType::Debit),
        ];
        let february = DateRange::new(date(2024, 2, 1), date(2024, 2, 29));

        let previous = calculate(&previous_entries, &accounts, "c1", january());
        let current = calculate(&current_entries, &accounts, "c1", february);
        let delta = compare(&previous, &current);

        assert!((delta.revenue_change_pct - 20.0).abs() < 1e-9);
        assert!((delta.net_income_change_pct - 50.0).abs() < 1e-9);
        assert!((delta.net_margin_change_pts - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_compare_zero_previous_is_zero() {
        let accounts = basic_accounts();
        let previous = calculate(&[], &accounts, "c1", january());
        let current_entries = vec![entry(
            "e1",
            "c1",
            "a1",
            date(2024, 2, 5),
            1000.0,
            EntryType::Credit,
        )];
        let february = DateRange::new(date(2024, 2, 1), date(2024, 2, 29));
        let current = calculate(&current_entries, &accounts, "c1", february);

        let delta = compare(&previous, &current);
        assert_eq!(delta.revenue_change_pct, 0.0);
        assert_eq!(delta.net_income_change_pct, 0.0);
        assert_eq!(delta.net_margin_change_pts, 100.0);
    }

    #[test]
    fn test_compare_across_zero_keeps_previous_magnitude() {
        let accounts = basic_accounts();
        let loss_entries = vec![entry(
            "e1",
            "c1",
            "a2",
            date(2024, 1, 5),
            200.0,
            EntryType::Debit,
        )];
        let profit_entries = vec![entry(
            "e2",
            "c1",
            "a1",
            date(2024, 2, 5),
            200.0,
            EntryType::Credit,
        )];
        let february = DateRange::new(date(2024, 2, 1), date(2024, 2, 29));

        let previous = calculate(&loss_entries, &accounts, "c1", january());
        let current = calculate(&profit_entries, &accounts, "c1", february);
        let delta = compare(&previous, &current);

        // -200 -> +200 over |previous| = +200%.
        assert!((delta.net_income_change_pct - 200.0).abs() < 1e-9);
    }
}
