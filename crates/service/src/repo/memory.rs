use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use models::book::BookState;
use models::errors::ModelError;
use models::pay_log::PayLogKind;
use models::users::UserType;

use crate::auth::domain::Credentials;
use crate::booking::domain::{Book, BookDraft, BookFilter, BookLine, Refund};
use crate::booking::repository::BookRepository;
use crate::errors::ServiceError;
use crate::laundry::domain::{Laundry, Settlement};
use crate::laundry::repository::LaundryRepository;
use crate::metapay::domain::{Metapay, PayAccount, PayLog};
use crate::metapay::repository::MetapayRepository;
use crate::users::domain::{NewUser, ProfileUpdate, User};
use crate::users::repository::UserRepository;

struct Wallet {
    id: Uuid,
    user_id: Uuid,
    balance: i64,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    creds: HashMap<Uuid, Credentials>,
    laundries: Vec<Laundry>,
    /// Insertion order; listings walk it backwards.
    books: Vec<Book>,
    wallets: Vec<Wallet>,
    pay_accounts: Vec<(Uuid, PayAccount)>,
    pay_logs: Vec<PayLog>,
    settlements: Vec<Settlement>,
}

impl State {
    fn wallet_mut(&mut self, id: Uuid) -> Result<&mut Wallet, ServiceError> {
        self.wallets.iter_mut().find(|w| w.id == id).ok_or_else(|| ServiceError::not_found("metapay account"))
    }

    fn metapay(&self, wallet: &Wallet) -> Metapay {
        Metapay {
            id: wallet.id,
            user_id: wallet.user_id,
            balance: wallet.balance,
            created_at: wallet.created_at,
            pay_accounts: self.pay_accounts.iter().filter(|(m, _)| *m == wallet.id).map(|(_, a)| a.clone()).collect(),
        }
    }

    /// Compare-and-set on the stored state.
    fn transition(&mut self, book: &Book, to: BookState) -> Result<&mut Book, ServiceError> {
        let stored = self.books.iter_mut().find(|b| b.id == book.id).ok_or_else(|| ServiceError::not_found("book"))?;
        if stored.state != book.state {
            return Err(ServiceError::InvalidState("booking state changed concurrently".into()));
        }
        stored.state = to;
        stored.updated_at = Utc::now();
        Ok(stored)
    }

    fn log(&mut self, metapay_id: Uuid, book_id: Option<Uuid>, pay_account_id: Option<Uuid>, kind: PayLogKind, amount: i64, balance_after: i64) {
        self.pay_logs.push(PayLog {
            id: Uuid::new_v4(),
            metapay_id: Some(metapay_id),
            book_id,
            pay_account_id,
            kind,
            amount,
            balance_after,
            created_at: Utc::now(),
        });
    }
}

/// In-memory implementation of every repository trait.
///
/// Each method takes the lock once, so multi-row writes are atomic with
/// respect to other callers, like a database transaction.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a user without credentials.
    pub fn seed_user(&self, login_id: &str, user_type: UserType) -> User {
        let user = User {
            id: Uuid::new_v4(),
            login_id: login_id.to_string(),
            name: login_id.to_string(),
            phone: "01000000000".into(),
            user_type,
            created_at: Utc::now(),
        };
        self.state().users.push(user.clone());
        user
    }

    pub fn seed_laundry(&self, owner_id: Uuid, name: &str) -> Laundry {
        let laundry = Laundry {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            address: "Seoul".into(),
            tel: "0200000000".into(),
            created_at: Utc::now(),
        };
        self.state().laundries.push(laundry.clone());
        laundry
    }

    pub fn settlements_for(&self, laundry_id: Uuid) -> Vec<Settlement> {
        self.state().settlements.iter().filter(|s| s.laundry_id == laundry_id).cloned().collect()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_login_id(&self, login_id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.state().users.iter().find(|u| u.login_id == login_id).cloned())
    }

    async fn create_user(&self, new: NewUser, password_hash: String, password_algorithm: String) -> Result<User, ServiceError> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.login_id == new.login_id) {
            return Err(ModelError::Conflict(format!("login id {} already taken", new.login_id)).into());
        }
        let user = User {
            id: Uuid::new_v4(),
            login_id: new.login_id,
            name: new.name,
            phone: new.phone,
            user_type: new.user_type,
            created_at: Utc::now(),
        };
        state.creds.insert(user.id, Credentials { user_id: user.id, password_hash, password_algorithm });
        state.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, ServiceError> {
        let mut state = self.state();
        let user = state.users.iter_mut().find(|u| u.id == id).ok_or_else(|| ServiceError::not_found("user"))?;
        if let Some(name) = update.name { user.name = name; }
        if let Some(phone) = update.phone { user.phone = phone; }
        Ok(user.clone())
    }

    async fn list_users(&self, user_type: Option<UserType>) -> Result<Vec<User>, ServiceError> {
        Ok(self.state().users.iter().filter(|u| user_type.map_or(true, |t| u.user_type == t)).cloned().collect())
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError> {
        Ok(self.state().creds.get(&user_id).cloned())
    }
}

#[async_trait]
impl LaundryRepository for MemoryStore {
    async fn create_laundry(&self, owner_id: Uuid, name: &str, address: &str, tel: &str) -> Result<Laundry, ServiceError> {
        let laundry = Laundry {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            address: address.to_string(),
            tel: tel.to_string(),
            created_at: Utc::now(),
        };
        self.state().laundries.push(laundry.clone());
        Ok(laundry)
    }

    async fn find_laundry(&self, id: Uuid) -> Result<Option<Laundry>, ServiceError> {
        Ok(self.state().laundries.iter().find(|l| l.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Laundry>, ServiceError> {
        Ok(self.state().laundries.iter().filter(|l| l.owner_id == owner_id).cloned().collect())
    }

    async fn list_settlements(&self, laundry_id: Uuid) -> Result<Vec<Settlement>, ServiceError> {
        Ok(self.state().settlements.iter().rev().filter(|s| s.laundry_id == laundry_id).cloned().collect())
    }
}

#[async_trait]
impl MetapayRepository for MemoryStore {
    async fn create_metapay(&self, user_id: Uuid) -> Result<Metapay, ServiceError> {
        let mut state = self.state();
        if state.wallets.iter().any(|w| w.user_id == user_id) {
            return Err(ModelError::Conflict(format!("metapay account for {user_id}")).into());
        }
        let wallet = Wallet { id: Uuid::new_v4(), user_id, balance: 0, created_at: Utc::now() };
        let view = state.metapay(&wallet);
        state.wallets.push(wallet);
        Ok(view)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Metapay>, ServiceError> {
        let state = self.state();
        Ok(state.wallets.iter().find(|w| w.user_id == user_id).map(|w| state.metapay(w)))
    }

    async fn add_pay_account(&self, metapay_id: Uuid, bank_id: i16, account_number: &str) -> Result<PayAccount, ServiceError> {
        let mut state = self.state();
        state.wallet_mut(metapay_id)?;
        let account = PayAccount::new(Uuid::new_v4(), bank_id, account_number.to_string(), Utc::now());
        state.pay_accounts.push((metapay_id, account.clone()));
        Ok(account)
    }

    async fn charge(&self, metapay_id: Uuid, pay_account_id: Uuid, amount: i64) -> Result<Metapay, ServiceError> {
        let mut state = self.state();
        let wallet = state.wallet_mut(metapay_id)?;
        wallet.balance = wallet.balance.checked_add(amount).ok_or_else(|| ServiceError::Validation("balance overflow".into()))?;
        let balance = wallet.balance;
        state.log(metapay_id, None, Some(pay_account_id), PayLogKind::Charge, amount, balance);
        let wallet = state.wallets.iter().find(|w| w.id == metapay_id).ok_or_else(|| ServiceError::not_found("metapay account"))?;
        Ok(state.metapay(wallet))
    }

    async fn list_logs(&self, metapay_id: Uuid) -> Result<Vec<PayLog>, ServiceError> {
        Ok(self.state().pay_logs.iter().rev().filter(|l| l.metapay_id == Some(metapay_id)).cloned().collect())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn insert_book(&self, draft: BookDraft) -> Result<Book, ServiceError> {
        let mut state = self.state();
        let book_id = Uuid::new_v4();
        if let Some(metapay_id) = draft.debit_from {
            let wallet = state.wallet_mut(metapay_id)?;
            if wallet.balance < draft.total_fee {
                return Err(ServiceError::InsufficientBalance { balance: wallet.balance, required: draft.total_fee });
            }
            wallet.balance -= draft.total_fee;
            let balance = wallet.balance;
            state.log(metapay_id, Some(book_id), None, PayLogKind::Payment, -draft.total_fee, balance);
        }
        let now = Utc::now();
        let book = Book {
            id: book_id,
            user_id: draft.user_id,
            laundry_id: draft.laundry_id,
            book_count: draft.lines.len() as i32,
            memo: draft.memo,
            method: draft.method,
            total_fee: draft.total_fee,
            state: BookState::Pending,
            created_at: now,
            updated_at: now,
            lines: (1..)
                .zip(draft.lines.iter())
                .map(|(no, l)| BookLine::new(no, l.clothes_id, l.fabric_id, l.fee))
                .collect(),
        };
        state.books.push(book.clone());
        Ok(book)
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<Book>, ServiceError> {
        Ok(self.state().books.iter().find(|b| b.id == id).cloned())
    }

    async fn update_state(&self, book: &Book, to: BookState) -> Result<Book, ServiceError> {
        Ok(self.state().transition(book, to)?.clone())
    }

    async fn complete_book(&self, book: &Book) -> Result<Book, ServiceError> {
        let mut state = self.state();
        if state.settlements.iter().any(|s| s.book_id == book.id) {
            return Err(ServiceError::InvalidState("booking already settled".into()));
        }
        let updated = state.transition(book, BookState::Complete)?.clone();
        state.settlements.push(Settlement {
            id: Uuid::new_v4(),
            book_id: updated.id,
            laundry_id: updated.laundry_id,
            amount: updated.total_fee,
            settled_at: Utc::now(),
        });
        Ok(updated)
    }

    async fn cancel_book(&self, book: &Book, refund: Option<Refund>) -> Result<Book, ServiceError> {
        let mut state = self.state();
        if let Some(r) = refund {
            state.wallet_mut(r.metapay_id)?;
        }
        let updated = state.transition(book, BookState::Canceled)?.clone();
        if let Some(r) = refund {
            let wallet = state.wallet_mut(r.metapay_id)?;
            wallet.balance += r.amount;
            let balance = wallet.balance;
            state.log(r.metapay_id, Some(updated.id), None, PayLogKind::Refund, r.amount, balance);
        }
        Ok(updated)
    }

    async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>, ServiceError> {
        let state = self.state();
        let matching = state.books.iter().rev().filter(|b| filter.matches(b)).cloned();
        Ok(match filter.page {
            Some((idx, per)) => matching.skip((idx * per) as usize).take(per as usize).collect(),
            None => matching.collect(),
        })
    }
}
