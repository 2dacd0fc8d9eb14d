//! Cost-bucket classification for drill-down analytics.
//!
//! Maps free-text account names (plus the declared statement category as a
//! weak signal) onto a fixed set of analytical buckets through an ordered
//! keyword cascade. The cascade is a data table rather than control flow so
//! rule order and coverage can be tested on their own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Account, AccountRegistry, LedgerEntry};
use crate::period::DateRange;
use crate::types::EntryType;

/// Analytical cost buckets; distinct from the nine statement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostBucket {
    Extras,
    #[serde(rename = "Bands & Artists")]
    BandsOrArtists,
    Merchandise,
    Equipment,
    Marketing,
    #[serde(rename = "Rent & Infrastructure")]
    RentOrInfrastructure,
    Services,
    #[serde(rename = "Taxes & Fees")]
    TaxesAndFees,
    Financial,
    Other,
}

impl std::fmt::Display for CostBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostBucket::Extras => write!(f, "Extras"),
            CostBucket::BandsOrArtists => write!(f, "Bands & Artists"),
            CostBucket::Merchandise => write!(f, "Merchandise"),
            CostBucket::Equipment => write!(f, "Equipment"),
            CostBucket::Marketing => write!(f, "Marketing"),
            CostBucket::RentOrInfrastructure => write!(f, "Rent & Infrastructure"),
            CostBucket::Services => write!(f, "Services"),
            CostBucket::TaxesAndFees => write!(f, "Taxes & Fees"),
            CostBucket::Financial => write!(f, "Financial"),
            CostBucket::Other => write!(f, "Other"),
        }
    }
}

/// One cascade rule.
///
/// A rule matches when the upper-cased account name contains any of the name
/// keywords, or when the upper-cased declared category satisfies any of the
/// keyword conjunctions. Evaluation order is the table order; the first match
/// wins.
struct Rule {
    bucket: CostBucket,
    name_keywords: &'static [&'static str],
    category_keywords: &'static [&'static [&'static str]],
}

/// Ledger data arrives in Portuguese, so the name keywords keep both the
/// accented and unaccented spellings the source data uses. Category keywords
/// follow the canonical category labels.
const RULES: &[Rule] = &[
    Rule {
        bucket: CostBucket::Extras,
        name_keywords: &[
            "EXTRA",
            "ADICIONAL",
            "HORA EXTRA",
            "OVERTIME",
            "COMPLEMENTO",
            "GRATIFICACAO",
            "GRATIFICAÇÃO",
            "BONUS",
            "BÔNUS",
        ],
        category_keywords: &[],
    },
    Rule {
        bucket: CostBucket::BandsOrArtists,
        name_keywords: &[
            "BANDA",
            "ARTISTA",
            "MÚSICO",
            "MUSICO",
            "SHOW",
            "APRESENTAÇÃO",
            "APRESENTACAO",
            "CACHÊ",
            "CACHE",
            "PERFORMANCE",
        ],
        category_keywords: &[],
    },
    Rule {
        bucket: CostBucket::Merchandise,
        name_keywords: &[
            "MERCADORIA",
            "PRODUTO",
            "ESTOQUE",
            "COMPRA",
            "FORNECEDOR",
            "MATÉRIA",
            "MATERIA",
        ],
        category_keywords: &[&["COST", "GOODS"]],
    },
    Rule {
        bucket: CostBucket::Equipment,
        name_keywords: &[
            "EQUIPAMENTO",
            "MAQUINA",
            "MÁQUINA",
            "FERRAMENTA",
            "INSTRUMENTO",
            "APARELHO",
            "COMPUTADOR",
            "SOFTWARE",
            "LICENCA",
            "LICENÇA",
        ],
        category_keywords: &[],
    },
    Rule {
        bucket: CostBucket::Marketing,
        name_keywords: &[
            "MARKETING",
            "PUBLICIDADE",
            "PROPAGANDA",
            "DIVULGAÇÃO",
            "DIVULGACAO",
            "SOCIAL MEDIA",
            "MÍDIA",
            "MIDIA",
        ],
        category_keywords: &[],
    },
    Rule {
        bucket: CostBucket::RentOrInfrastructure,
        name_keywords: &[
            "ALUGUEL",
            "ALUGUER",
            "LOCAÇÃO",
            "LOCACAO",
            "IMÓVEL",
            "IMOVEL",
            "PREDIAL",
            "CONDOMÍNIO",
            "CONDOMINIO",
            "ENERGIA",
            "AGUA",
            "ÁGUA",
            "TELEFONE",
            "INTERNET",
            "MANUTENCAO",
            "MANUTENÇÃO",
            "LIMPEZA",
        ],
        category_keywords: &[],
    },
    Rule {
        bucket: CostBucket::Services,
        name_keywords: &[
            "SERVIÇO",
            "SERVICO",
            "CONSULTORIA",
            "ASSESSORIA",
            "SEGURANÇA",
            "SEGURANCA",
        ],
        category_keywords: &[
            &["EXPENSES", "ADMINISTRATIVE"],
            &["EXPENSES", "COMMERCIAL"],
        ],
    },
    Rule {
        bucket: CostBucket::TaxesAndFees,
        name_keywords: &[
            "IMPOSTO",
            "TAXA",
            "TRIBUTO",
            "ICMS",
            "PIS",
            "COFINS",
            "ISS",
            "IRPJ",
            "CSLL",
        ],
        category_keywords: &[&["TAX"], &["DEDUCTION"]],
    },
    Rule {
        bucket: CostBucket::Financial,
        name_keywords: &[
            "JUROS",
            "FINANCIAMENTO",
            "EMPRÉSTIMO",
            "EMPRESTIMO",
            "BANCO",
            "CARTÃO",
            "CARTAO",
            "TARIFA",
        ],
        category_keywords: &[&["FINANCIAL"]],
    },
];

/// Classify an account into its analytical cost bucket.
///
/// Case-insensitive, total, and order-sensitive: a name matching several
/// rules lands in whichever is listed first. No match means
/// [`CostBucket::Other`].
pub fn classify(name: &str, declared_category: &str) -> CostBucket {
    let name = name.to_uppercase();
    let category = declared_category.to_uppercase();

    for rule in RULES {
        let name_hit = rule.name_keywords.iter().any(|kw| name.contains(kw));
        let category_hit = rule
            .category_keywords
            .iter()
            .any(|conjunction| conjunction.iter().all(|kw| category.contains(kw)));
        if name_hit || category_hit {
            return rule.bucket;
        }
    }
    CostBucket::Other
}

/// One slice of the cost-distribution donut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketShare {
    pub bucket: CostBucket,
    pub total: f64,
    /// Percent of the grand total across all buckets in the window.
    pub share_pct: f64,
}

/// Distribution of in-window debit spend across cost buckets.
///
/// Only debit entries participate (the view answers "where did money go"),
/// empty buckets are omitted, and the result is sorted by total descending.
pub fn cost_distribution(
    entries: &[LedgerEntry],
    accounts: &[Account],
    company_id: &str,
    range: DateRange,
) -> Vec<BucketShare> {
    let registry = AccountRegistry::new(accounts);
    let mut totals: HashMap<CostBucket, f64> = HashMap::new();

    for entry in entries {
        if entry.company_id != company_id
            || entry.entry_type != EntryType::Debit
            || !range.contains(entry.date)
        {
            continue;
        }
        let Some(account) = registry.get(&entry.account_id) else {
            continue;
        };
        let bucket = classify(&account.name, &account.category.to_string());
        *totals.entry(bucket).or_insert(0.0) += entry.amount;
    }

    let grand_total: f64 = totals.values().sum();
    let mut shares: Vec<BucketShare> = totals
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(bucket, total)| BucketShare {
            bucket,
            total,
            share_pct: if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    shares.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    shares
}

// ==================== Tests ====================
