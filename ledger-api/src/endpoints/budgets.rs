use super::amount;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{EmptyResponse, Method, Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub id: String,
    pub category: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
}

/// Write payload shared by create and update; the amount goes out as a string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveBudget {
    pub category: String,
    #[serde(serialize_with = "amount::serialize")]
    pub amount: f64,
}

// Requests

#[derive(Default, Debug, Clone)]
pub struct ListBudgets;

impl Request for ListBudgets {
    type Data = ();
    type Response = Vec<BudgetRecord>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/budgets".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBudget {
    #[serde(flatten)]
    budget: SaveBudget,
}

impl CreateBudget {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            budget: SaveBudget {
                category: category.into(),
                amount,
            },
        }
    }
}

impl Request for CreateBudget {
    type Data = Self;
    type Response = BudgetRecord;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/budgets".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBudget {
    #[serde(skip)]
    budget_id: String,
    #[serde(flatten)]
    budget: SaveBudget,
}

impl UpdateBudget {
    pub fn new(budget_id: impl Into<String>, category: impl Into<String>, amount: f64) -> Self {
        Self {
            budget_id: budget_id.into(),
            budget: SaveBudget {
                category: category.into(),
                amount,
            },
        }
    }
}

impl Request for UpdateBudget {
    type Data = Self;
    type Response = BudgetRecord;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/budgets/{}", self.budget_id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBudget {
    pub budget_id: String,
}

impl DeleteBudget {
    pub fn new(budget_id: impl Into<String>) -> Self {
        Self {
            budget_id: budget_id.into(),
        }
    }
}

impl Request for DeleteBudget {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/budgets/{}", self.budget_id).into()
    }
}
