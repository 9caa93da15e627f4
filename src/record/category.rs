//! Transaction categories.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The category a transaction is filed under.
///
/// The form only offers the fixed categories, but stored data may contain
/// any text, which is kept as [Category::Custom].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    FoodAndBev,
    Alcohol,
    Decor,
    Services,
    Reimbursement,
    Dues,
    Door,
    Fine,
    Other,
    Custom(String),
}

impl Category {
    /// The categories offered by the transaction form, in display order.
    pub const FIXED: [Category; 9] = [
        Category::FoodAndBev,
        Category::Alcohol,
        Category::Decor,
        Category::Services,
        Category::Reimbursement,
        Category::Dues,
        Category::Door,
        Category::Fine,
        Category::Other,
    ];

    /// Parse one of the fixed categories, rejecting anything else.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownCategory] if `text` is not the name of a fixed category.
    pub fn fixed(text: &str) -> Result<Self, Error> {
        match Category::from(text) {
            Category::Custom(other) => Err(Error::UnknownCategory(other)),
            category => Ok(category),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::FoodAndBev => "FoodAndBev",
            Category::Alcohol => "Alcohol",
            Category::Decor => "Decor",
            Category::Services => "Services",
            Category::Reimbursement => "Reimbursement",
            Category::Dues => "Dues",
            Category::Door => "Door",
            Category::Fine => "Fine",
            Category::Other => "Other",
            Category::Custom(name) => name,
        }
    }
}

impl From<&str> for Category {
    /// Never fails. Blank text is filed under [Category::Other].
    fn from(text: &str) -> Self {
        match text.trim() {
            "FoodAndBev" => Category::FoodAndBev,
            "Alcohol" => Category::Alcohol,
            "Decor" => Category::Decor,
            "Services" => Category::Services,
            "Reimbursement" => Category::Reimbursement,
            "Dues" => Category::Dues,
            "Door" => Category::Door,
            "Fine" => Category::Fine,
            "Other" | "" => Category::Other,
            other => Category::Custom(other.to_owned()),
        }
    }
}

impl From<String> for Category {
    fn from(text: String) -> Self {
        Category::from(text.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_owned()
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::fixed(s)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::Category;

    #[test]
    fn fixed_categories_round_trip_through_text() {
        for category in Category::FIXED {
            assert_eq!(Category::from(category.as_str()), category);
        }
    }

    #[test]
    fn unknown_text_becomes_custom() {
        assert_eq!(
            Category::from("Raffle"),
            Category::Custom("Raffle".to_owned())
        );
    }

    #[test]
    fn blank_text_is_other() {
        assert_eq!(Category::from("  "), Category::Other);
    }

    #[test]
    fn fixed_rejects_custom_category() {
        assert_eq!(
            Category::fixed("Raffle"),
            Err(Error::UnknownCategory("Raffle".to_owned()))
        );
        assert_eq!(Category::fixed("Door"), Ok(Category::Door));
    }
}
