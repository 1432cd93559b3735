//! Fixed lookup tables for clothing types, fabrics and banks.
//!
//! Ids are 1-based and stored as `SMALLINT` columns on `book_line` and
//! `pay_account`.

use serde::Serialize;

use crate::errors::ModelError;

pub const CLOTHES: [&str; 20] = [
    "상의/자켓",
    "하의",
    "스커트",
    "와이셔츠/남방",
    "티셔츠",
    "블라우스",
    "원피스",
    "스웨터/가디건",
    "봄가을점퍼/아웃도어",
    "코트",
    "가죽/모피의류",
    "겨울패딩/점퍼",
    "넥타이",
    "스카프/목도리",
    "이불/침구류",
    "커튼/카페트",
    "한복류",
    "모자",
    "가방/기타가죽제품",
    "운동화/스니커즈류",
];

pub const FABRICS: [&str; 9] = ["면", "니트", "레이온", "데님", "실크/쉬폰", "린넨", "퍼", "앙고라", "가죽"];

pub const BANKS: [&str; 4] = ["농협", "국민", "우리", "하나"];

fn lookup(table: &'static [&'static str], id: i16) -> Option<&'static str> {
    let idx = usize::try_from(id).ok()?.checked_sub(1)?;
    table.get(idx).copied()
}

pub fn clothes_name(id: i16) -> Option<&'static str> { lookup(&CLOTHES, id) }

pub fn fabric_name(id: i16) -> Option<&'static str> { lookup(&FABRICS, id) }

pub fn bank_name(id: i16) -> Option<&'static str> { lookup(&BANKS, id) }

pub fn validate_clothes(id: i16) -> Result<&'static str, ModelError> {
    clothes_name(id).ok_or_else(|| ModelError::Validation(format!("unknown clothes id {id}")))
}

pub fn validate_fabric(id: i16) -> Result<&'static str, ModelError> {
    fabric_name(id).ok_or_else(|| ModelError::Validation(format!("unknown fabric id {id}")))
}

pub fn validate_bank(id: i16) -> Result<&'static str, ModelError> {
    bank_name(id).ok_or_else(|| ModelError::Validation(format!("unknown bank id {id}")))
}

#[derive(Clone, Debug, Serialize)]
pub struct CatalogEntry {
    pub id: i16,
    pub name: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct Catalog {
    pub clothes: Vec<CatalogEntry>,
    pub fabrics: Vec<CatalogEntry>,
    pub banks: Vec<CatalogEntry>,
}

fn entries(table: &'static [&'static str]) -> Vec<CatalogEntry> {
    (1i16..).zip(table.iter()).map(|(id, name)| CatalogEntry { id, name }).collect()
}

/// Snapshot of every table, as served by the catalog endpoint.
pub fn catalog() -> Catalog {
    Catalog { clothes: entries(&CLOTHES), fabrics: entries(&FABRICS), banks: entries(&BANKS) }
}
