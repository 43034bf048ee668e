use crate::domain::commands::expenses::{CreateExpenseCommand, ExpenseAmount};
use crate::domain::models::expense::Expense as DomainExpense;
use shared::{AmountInput, CreateExpenseRequest, Expense as SharedExpense};

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_dto(domain: DomainExpense) -> SharedExpense {
        SharedExpense {
            id: domain.id,
            amount: domain.amount,
            occurred_time: domain.occurred_time,
            category: domain.category,
        }
    }

    pub fn to_create_command(request: CreateExpenseRequest) -> CreateExpenseCommand {
        CreateExpenseCommand {
            amount: match request.amount {
                AmountInput::Number(amount) => ExpenseAmount::Exact(amount),
                AmountInput::Text(text) => ExpenseAmount::Text(text),
            },
            category: request.category,
            occurred_time: request.occurred_time,
        }
    }
}
