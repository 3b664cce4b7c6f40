//! In-code catalogs: transaction categories and challenge templates.
//!
//! These are fixed app content, not stored records. Records denormalize the
//! icon/color of their catalog entry at creation time, so later catalog
//! edits never rewrite history.

use crate::domain::models::transaction::TransactionType;

/// One selectable transaction category with its presentation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const EXPENSE_CATEGORIES: &[CategoryDef] = &[
    CategoryDef { name: "Alimentação", icon: "food", color: "#FF9F43" },
    CategoryDef { name: "Transporte", icon: "car", color: "#54A0FF" },
    CategoryDef { name: "Lazer", icon: "popcorn", color: "#5F27CD" },
    CategoryDef { name: "Saúde", icon: "heart-pulse", color: "#EE5253" },
    CategoryDef { name: "Educação", icon: "school", color: "#00D2D3" },
    CategoryDef { name: "Moradia", icon: "home", color: "#10AC84" },
    CategoryDef { name: "Compras", icon: "cart", color: "#01a3a4" },
    CategoryDef { name: "Outros", icon: "dots-horizontal", color: "#8395a7" },
];

pub const INCOME_CATEGORIES: &[CategoryDef] = &[
    CategoryDef { name: "Salário", icon: "cash", color: "#10AC84" },
    CategoryDef { name: "Investimentos", icon: "chart-line", color: "#2E86DE" },
    CategoryDef { name: "Presente", icon: "gift", color: "#FF9F43" },
    CategoryDef { name: "Vendas", icon: "store", color: "#EE5253" },
    CategoryDef { name: "Renda Extra", icon: "cash-multiple", color: "#01a3a4" },
    CategoryDef { name: "Outros", icon: "dots-horizontal", color: "#8395a7" },
];

/// The category list shown for a given transaction type.
pub fn categories_for(transaction_type: TransactionType) -> &'static [CategoryDef] {
    match transaction_type {
        TransactionType::Expense => EXPENSE_CATEGORIES,
        TransactionType::Income => INCOME_CATEGORIES,
    }
}

/// Look up a category by name within one transaction type's list.
pub fn find_category(
    transaction_type: TransactionType,
    name: &str,
) -> Option<&'static CategoryDef> {
    categories_for(transaction_type)
        .iter()
        .find(|c| c.name == name)
}

/// A challenge template the user can start a savings challenge from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub icon: &'static str,
    pub icon_type: &'static str,
    pub color: &'static str,
    /// Zero means "no default": the caller must supply a goal.
    pub default_goal: f64,
}

pub const CHALLENGE_TEMPLATES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "guardando-dinheiro",
        title: "Guardando Dinheiro",
        subtitle: "Focado em economia mensal recorrente.",
        icon: "piggy-bank",
        icon_type: "MaterialCommunityIcons",
        color: "#3b82f6",
        default_goal: 1000.0,
    },
    ChallengeTemplate {
        id: "desafio-chines",
        title: "Desafio Chinês",
        subtitle: "Junte dinheiro de forma crescente.",
        icon: "grid-outline",
        icon_type: "Ionicons",
        color: "#0ea5e9",
        default_goal: 2000.0,
    },
    ChallengeTemplate {
        id: "52-semanas",
        title: "52 Semanas",
        subtitle: "O clássico para poupar o ano todo.",
        icon: "calendar-outline",
        icon_type: "Ionicons",
        color: "#8b5cf6",
        default_goal: 1378.0,
    },
    ChallengeTemplate {
        id: "meta-livre",
        title: "Meta Livre",
        subtitle: "Crie um objetivo personalizado agora.",
        icon: "rocket-outline",
        icon_type: "Ionicons",
        color: "#f59e0b",
        default_goal: 0.0,
    },
];

pub fn find_template(id: &str) -> Option<&'static ChallengeTemplate> {
    CHALLENGE_TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_lookup_is_per_type() {
        assert!(find_category(TransactionType::Expense, "Alimentação").is_some());
        assert!(find_category(TransactionType::Income, "Alimentação").is_none());
        assert!(find_category(TransactionType::Income, "Salário").is_some());
    }

    #[test]
    fn both_types_offer_an_outros_category() {
        assert!(find_category(TransactionType::Expense, "Outros").is_some());
        assert!(find_category(TransactionType::Income, "Outros").is_some());
    }

    #[test]
    fn template_lookup_by_id() {
        let template = find_template("52-semanas").unwrap();
        assert_eq!(template.default_goal, 1378.0);
        assert!(find_template("nope").is_none());
    }
}
