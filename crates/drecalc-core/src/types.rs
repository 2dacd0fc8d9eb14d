//! Statement categories and entry types.

use serde::{Deserialize, Serialize};

/// The nine statement lines an account can roll into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Gross Revenue")]
    GrossRevenue,
    #[serde(rename = "Deductions & Taxes on Revenue")]
    RevenueDeductions,
    #[serde(rename = "Cost of Goods Sold")]
    CostOfGoodsSold,
    #[serde(rename = "Commercial Expenses")]
    CommercialExpenses,
    #[serde(rename = "Administrative Expenses")]
    AdministrativeExpenses,
    #[serde(rename = "Other Operating Expenses")]
    OtherOperatingExpenses,
    #[serde(rename = "Financial Income")]
    FinancialIncome,
    #[serde(rename = "Financial Expenses")]
    FinancialExpenses,
    #[serde(rename = "Income Tax Expenses")]
    IncomeTaxExpenses,
}

impl Category {
    /// All categories, in statement order.
    pub const ALL: [Category; 9] = [
        Category::GrossRevenue,
        Category::RevenueDeductions,
        Category::CostOfGoodsSold,
        Category::CommercialExpenses,
        Category::AdministrativeExpenses,
        Category::OtherOperatingExpenses,
        Category::FinancialIncome,
        Category::FinancialExpenses,
        Category::IncomeTaxExpenses,
    ];

    /// Revenue-like categories count credits as positive; every other
    /// category counts debits as positive.
    pub fn is_revenue(self) -> bool {
        matches!(self, Category::GrossRevenue | Category::FinancialIncome)
    }

    /// Resolve a category label as found in exported charts of accounts.
    ///
    /// Accepts the canonical label, the legacy Portuguese label, or a
    /// hierarchical account code whose top-level digit selects the category
    /// (e.g. `"3.1.01"` resolves through its leading `3`).
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        let canonical = match label {
            "Gross Revenue" | "Receita Bruta" => Some(Category::GrossRevenue),
            "Deductions & Taxes on Revenue" | "Deduções e Impostos" => {
                Some(Category::RevenueDeductions)
            }
            "Cost of Goods Sold" | "Custo dos Produtos Vendidos" => {
                Some(Category::CostOfGoodsSold)
            }
            "Commercial Expenses" | "Despesas Comerciais" => Some(Category::CommercialExpenses),
            "Administrative Expenses" | "Despesas Administrativas" => {
                Some(Category::AdministrativeExpenses)
            }
            "Other Operating Expenses" | "Outras Despesas Operacionais" => {
                Some(Category::OtherOperatingExpenses)
            }
            "Financial Income" | "Receitas Financeiras" => Some(Category::FinancialIncome),
            "Financial Expenses" | "Despesas Financeiras" => Some(Category::FinancialExpenses),
            "Income Tax Expenses" | "Impostos sobre Lucro" => Some(Category::IncomeTaxExpenses),
            _ => None,
        };
        if canonical.is_some() {
            return canonical;
        }

        // Top-level digit of a hierarchical code, e.g. "4.2" or "10.1.03".
        let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>().ok()? {
            1 => Some(Category::GrossRevenue),
            2 => Some(Category::RevenueDeductions),
            3 => Some(Category::CostOfGoodsSold),
            4 | 5 => Some(Category::AdministrativeExpenses),
            6 => Some(Category::OtherOperatingExpenses),
            7 => Some(Category::CommercialExpenses),
            8 => Some(Category::FinancialIncome),
            9 => Some(Category::FinancialExpenses),
            10 => Some(Category::IncomeTaxExpenses),
            _ => None,
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or_else(|| format!("Invalid category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::GrossRevenue => write!(f, "Gross Revenue"),
            Category::RevenueDeductions => write!(f, "Deductions & Taxes on Revenue"),
            Category::CostOfGoodsSold => write!(f, "Cost of Goods Sold"),
            Category::CommercialExpenses => write!(f, "Commercial Expenses"),
            Category::AdministrativeExpenses => write!(f, "Administrative Expenses"),
            Category::OtherOperatingExpenses => write!(f, "Other Operating Expenses"),
            Category::FinancialIncome => write!(f, "Financial Income"),
            Category::FinancialExpenses => write!(f, "Financial Expenses"),
            Category::IncomeTaxExpenses => write!(f, "Income Tax Expenses"),
        }
    }
}

/// Whether a ledger entry posts a debit or a credit.
///
/// The literal `"Debit"` / `"Credit"` encoding is the sign-convention
/// discriminator and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    /// Signed contribution of an entry to its category total.
    ///
    /// Revenue-like categories take credits as positive; everything else
    /// takes debits as positive. A negative `amount` flips the effective
    /// entry type; this is deliberate, not validated away.
    pub fn signed_amount(self, amount: f64, revenue_like: bool) -> f64 {
        let positive = match self {
            EntryType::Credit => revenue_like,
            EntryType::Debit => !revenue_like,
        };
        if positive {
            amount
        } else {
            -amount
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(EntryType::Debit),
            "credit" => Ok(EntryType::Credit),
            _ => Err(format!("Invalid entry type: {}", s)),
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Debit => write!(f, "Debit"),
            EntryType::Credit => write!(f, "Credit"),
        }
    }
}

// ==================== Tests ====================
