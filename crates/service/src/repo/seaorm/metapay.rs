use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use models::catalog::validate_bank;
use models::pay_account::validate_account_number;
use models::pay_log::PayLogKind;

use super::{now, utc};
use crate::errors::ServiceError;
use crate::metapay::domain::{Metapay, PayAccount, PayLog};
use crate::metapay::repository::MetapayRepository;

pub struct SeaOrmMetapayRepository {
    pub db: DatabaseConnection,
}

/// Adds `delta` to the balance in one `UPDATE`. Debits carry a
/// `balance >= -delta` guard so the balance never goes negative.
/// Returns the balance after the change.
pub(crate) async fn adjust_balance<C: ConnectionTrait>(db: &C, metapay_id: Uuid, delta: i64) -> Result<i64, ServiceError> {
    use models::metapay::{Column, Entity};

    let mut update = Entity::update_many()
        .col_expr(Column::Balance, Expr::col(Column::Balance).add(delta))
        .filter(Column::Id.eq(metapay_id));
    if delta < 0 {
        update = update.filter(Column::Balance.gte(-delta));
    }
    let res = update.exec(db).await?;
    let current = Entity::find_by_id(metapay_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("metapay account"))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::InsufficientBalance { balance: current.balance, required: -delta });
    }
    Ok(current.balance)
}

pub(crate) async fn insert_log<C: ConnectionTrait>(
    db: &C,
    metapay_id: Uuid,
    book_id: Option<Uuid>,
    pay_account_id: Option<Uuid>,
    kind: PayLogKind,
    amount: i64,
    balance_after: i64,
) -> Result<(), ServiceError> {
    models::pay_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        metapay_id: Set(Some(metapay_id)),
        book_id: Set(book_id),
        pay_account_id: Set(pay_account_id),
        kind: Set(kind.as_str().to_string()),
        amount: Set(amount),
        balance_after: Set(balance_after),
        created_at: Set(now()),
    }
    .insert(db)
    .await?;
    Ok(())
}

fn to_pay_account(m: models::pay_account::Model) -> PayAccount {
    PayAccount::new(m.id, m.bank_id, m.account_number, utc(m.created_at))
}

fn to_pay_log(m: models::pay_log::Model) -> Result<PayLog, ServiceError> {
    Ok(PayLog {
        kind: m.kind.parse()?,
        id: m.id,
        metapay_id: m.metapay_id,
        book_id: m.book_id,
        pay_account_id: m.pay_account_id,
        amount: m.amount,
        balance_after: m.balance_after,
        created_at: utc(m.created_at),
    })
}

async fn load<C: ConnectionTrait>(db: &C, wallet: models::metapay::Model) -> Result<Metapay, ServiceError> {
    let accounts = models::pay_account::Entity::find()
        .filter(models::pay_account::Column::MetapayId.eq(wallet.id))
        .order_by_asc(models::pay_account::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(Metapay {
        id: wallet.id,
        user_id: wallet.user_id,
        balance: wallet.balance,
        created_at: utc(wallet.created_at),
        pay_accounts: accounts.into_iter().map(to_pay_account).collect(),
    })
}

#[async_trait::async_trait]
impl MetapayRepository for SeaOrmMetapayRepository {
    async fn create_metapay(&self, user_id: Uuid) -> Result<Metapay, ServiceError> {
        let created = models::metapay::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            balance: Set(0),
            created_at: Set(now()),
        }
        .insert(&self.db)
        .await?;
        load(&self.db, created).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Metapay>, ServiceError> {
        let wallet = models::metapay::Entity::find()
            .filter(models::metapay::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        match wallet {
            Some(w) => Ok(Some(load(&self.db, w).await?)),
            None => Ok(None),
        }
    }

    async fn add_pay_account(&self, metapay_id: Uuid, bank_id: i16, account_number: &str) -> Result<PayAccount, ServiceError> {
        validate_bank(bank_id)?;
        validate_account_number(account_number)?;
        let created = models::pay_account::ActiveModel {
            id: Set(Uuid::new_v4()),
            metapay_id: Set(metapay_id),
            bank_id: Set(bank_id),
            account_number: Set(account_number.to_string()),
            created_at: Set(now()),
        }
        .insert(&self.db)
        .await?;
        Ok(to_pay_account(created))
    }

    async fn charge(&self, metapay_id: Uuid, pay_account_id: Uuid, amount: i64) -> Result<Metapay, ServiceError> {
        let txn = self.db.begin().await?;
        let balance = adjust_balance(&txn, metapay_id, amount).await?;
        insert_log(&txn, metapay_id, None, Some(pay_account_id), PayLogKind::Charge, amount, balance).await?;
        let wallet = models::metapay::Entity::find_by_id(metapay_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("metapay account"))?;
        let view = load(&txn, wallet).await?;
        txn.commit().await?;
        Ok(view)
    }

    async fn list_logs(&self, metapay_id: Uuid) -> Result<Vec<PayLog>, ServiceError> {
        models::pay_log::Entity::find()
            .filter(models::pay_log::Column::MetapayId.eq(metapay_id))
            .order_by_desc(models::pay_log::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_pay_log)
            .collect()
    }
}
