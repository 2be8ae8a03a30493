//! Income, expense and saving ledger.
//!
//! The three kinds are stored separately but listed and created through one
//! transaction shape. For incomes the request's `category` is the source, for
//! savings it is the purpose.

use shared::{CreateFinanceRequest, Expense, FinanceKind, FinanceTransaction, Income, Saving};
use tracing::info;
use uuid::Uuid;

use super::composer::expense_title;
use super::models::ServiceError;
use super::validation::{optional_text, positive_amount, required_date, required_text};
use crate::storage::FinanceRepository;

/// Category shown for savings in the merged ledger
const SAVINGS_CATEGORY: &str = "Savings";

#[derive(Clone)]
pub struct FinanceService {
    finance_repository: FinanceRepository,
}

impl FinanceService {
    pub fn new(finance_repository: FinanceRepository) -> Self {
        Self { finance_repository }
    }

    /// All three kinds merged, newest first
    pub async fn list_transactions(&self, owner: &str) -> Result<Vec<FinanceTransaction>, ServiceError> {
        let (incomes, expenses, savings) = tokio::try_join!(
            self.finance_repository.list_incomes(owner),
            self.finance_repository.list_expenses(owner),
            self.finance_repository.list_savings(owner),
        )?;

        let mut transactions: Vec<FinanceTransaction> = incomes
            .iter()
            .map(income_transaction)
            .chain(expenses.iter().map(expense_transaction))
            .chain(savings.iter().map(saving_transaction))
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(transactions)
    }

    pub async fn create_transaction(
        &self,
        owner: &str,
        request: CreateFinanceRequest,
    ) -> Result<FinanceTransaction, ServiceError> {
        let amount = positive_amount(request.amount)?;
        let category = required_text(&request.category, "Category")?;
        let date = required_date(&request.date, "Date")?;
        let id = Uuid::new_v4().to_string();
        let user_id = owner.to_string();

        let transaction = match request.kind {
            FinanceKind::Income => {
                let income = Income { id, user_id, amount, source: category, date };
                self.finance_repository.store_income(&income).await?;
                income_transaction(&income)
            }
            FinanceKind::Expense => {
                let expense = Expense {
                    id,
                    user_id,
                    amount,
                    category,
                    description: optional_text(request.description, "Description")?,
                    date,
                };
                self.finance_repository.store_expense(&expense).await?;
                expense_transaction(&expense)
            }
            FinanceKind::Saving => {
                let saving = Saving { id, user_id, amount, purpose: category, date };
                self.finance_repository.store_saving(&saving).await?;
                saving_transaction(&saving)
            }
        };

        info!(
            "Recorded {} {} of {:.2} for {}",
            transaction.kind.as_str(),
            transaction.id,
            transaction.amount,
            owner
        );
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, owner: &str, kind: FinanceKind, id: &str) -> Result<(), ServiceError> {
        if !self.finance_repository.delete(kind, owner, id).await? {
            return Err(ServiceError::NotFound("Transaction"));
        }
        info!("Deleted {} {} for {}", kind.as_str(), id, owner);
        Ok(())
    }
}

fn income_transaction(income: &Income) -> FinanceTransaction {
    FinanceTransaction {
        id: income.id.clone(),
        kind: FinanceKind::Income,
        amount: income.amount,
        category: income.source.clone(),
        title: income.source.clone(),
        date: income.date,
    }
}

fn expense_transaction(expense: &Expense) -> FinanceTransaction {
    FinanceTransaction {
        id: expense.id.clone(),
        kind: FinanceKind::Expense,
        amount: expense.amount,
        category: expense.category.clone(),
        title: expense_title(expense),
        date: expense.date,
    }
}

fn saving_transaction(saving: &Saving) -> FinanceTransaction {
    FinanceTransaction {
        id: saving.id.clone(),
        kind: FinanceKind::Saving,
        amount: saving.amount,
        category: SAVINGS_CATEGORY.to_string(),
        title: saving.purpose.clone(),
        date: saving.date,
    }
}
