//! Demo row types shown by the three table screens, with deterministic
//! generators so every run (and every test) sees the same data.

use crate::table::column::{Align, ColumnDecl, ColumnError, ColumnSet, Record};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

pub const WALLET_TABLE: &str = "wallet-table";
pub const PRODUCT_TABLE: &str = "product-table";
pub const NOTIFICATION_TABLE: &str = "notification-table";

const EPOCH: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

const USERS: [&str; 8] = [
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi",
];

fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn pick<T: Copy + Default>(rng: &mut StdRng, items: &[T]) -> T {
    items.choose(rng).copied().unwrap_or_default()
}

fn timestamp(offset_minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH, 0).unwrap_or_default() + Duration::minutes(offset_minutes)
}

fn money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn short_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

#[derive(Debug, Clone)]
pub struct WalletTransaction {
    pub id: u64,
    pub user: String,
    pub kind: &'static str,
    pub amount_cents: i64,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
}

impl Record for WalletTransaction {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, key: &str) -> Option<String> {
        Some(match key {
            "id" => self.id.to_string(),
            "user" => self.user.clone(),
            "kind" => self.kind.to_string(),
            "amount" => money(self.amount_cents),
            "status" => self.status.to_string(),
            "created_at" => self.created_at.to_rfc3339(),
            _ => return None,
        })
    }
}

impl WalletTransaction {
    pub const SEARCHABLE: &'static [&'static str] = &["user", "kind", "status"];

    pub fn generate(count: usize) -> Vec<Self> {
        let mut rng = seeded(0x5eed_0001);
        (1..=count as u64)
            .map(|id| {
                let kind = pick(&mut rng, &["deposit", "withdrawal", "transfer", "refund"]);
                let magnitude = rng.random_range(100..250_100_i64);
                let amount_cents = match kind {
                    "withdrawal" | "transfer" => -magnitude,
                    _ => magnitude,
                };
                Self {
                    id,
                    user: pick(&mut rng, &USERS).to_string(),
                    kind,
                    amount_cents,
                    status: pick(&mut rng, &["pending", "settled", "settled", "settled", "failed"]),
                    created_at: timestamp(id as i64 * 37),
                }
            })
            .collect()
    }

    pub fn columns() -> Result<ColumnSet<Self>, ColumnError> {
        ColumnSet::new(vec![
            ColumnDecl::new("id", "ID").percent(8.0).align(Align::Right),
            ColumnDecl::new("user", "User").align(Align::Left),
            ColumnDecl::new("kind", "Type"),
            ColumnDecl::new("amount", "Amount")
                .percent(16.0)
                .align(Align::Right)
                .render(|t: &Self| {
                    let sign = if t.amount_cents < 0 { "-" } else { "+" };
                    format!("{sign}${}", money(t.amount_cents.abs()))
                }),
            ColumnDecl::new("status", "Status").render(|t: &Self| t.status.to_uppercase()),
            ColumnDecl::new("created_at", "Created")
                .percent(20.0)
                .render(|t: &Self| short_time(&t.created_at)),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: u64,
    pub sku: String,
    pub name: String,
    pub category: &'static str,
    pub price_cents: i64,
    pub stock: u32,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

impl Record for Product {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, key: &str) -> Option<String> {
        Some(match key {
            "id" => self.id.to_string(),
            "sku" => self.sku.clone(),
            "name" => self.name.clone(),
            "category" => self.category.to_string(),
            "price" => money(self.price_cents),
            "stock" => self.stock.to_string(),
            "active" => self.active.to_string(),
            "updated_at" => self.updated_at.to_rfc3339(),
            _ => return None,
        })
    }
}

impl Product {
    pub const SEARCHABLE: &'static [&'static str] = &["sku", "name", "category"];

    pub fn generate(count: usize) -> Vec<Self> {
        const ADJECTIVES: [&str; 6] = ["Compact", "Deluxe", "Classic", "Smart", "Eco", "Pro"];
        const NOUNS: [(&str, &str); 8] = [
            ("Lamp", "home"),
            ("Kettle", "kitchen"),
            ("Backpack", "outdoor"),
            ("Headphones", "audio"),
            ("Blender", "kitchen"),
            ("Tent", "outdoor"),
            ("Speaker", "audio"),
            ("Rug", "home"),
        ];
        let mut rng = seeded(0x5eed_0002);
        (1..=count as u64)
            .map(|id| {
                let (noun, category) = pick(&mut rng, &NOUNS);
                Self {
                    id,
                    sku: format!("SKU-{:05}", id * 7 + rng.random_range(0..7)),
                    name: format!("{} {noun}", pick(&mut rng, &ADJECTIVES)),
                    category,
                    price_cents: rng.random_range(499..60_499),
                    stock: rng.random_range(0..400),
                    active: rng.random_bool(0.9),
                    updated_at: timestamp(id as i64 * 113),
                }
            })
            .collect()
    }

    pub fn columns() -> Result<ColumnSet<Self>, ColumnError> {
        ColumnSet::new(vec![
            ColumnDecl::new("sku", "SKU").percent(12.0).align(Align::Left),
            ColumnDecl::new("name", "Name").align(Align::Left),
            ColumnDecl::new("category", "Category").render(|p: &Self| {
                let mut chars = p.category.chars();
                chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }),
            ColumnDecl::new("price", "Price")
                .percent(12.0)
                .align(Align::Right)
                .render(|p: &Self| format!("${}", money(p.price_cents))),
            ColumnDecl::new("stock", "Stock").percent(8.0).align(Align::Right).render(|p: &Self| {
                if p.stock == 0 {
                    "sold out".to_string()
                } else {
                    p.stock.to_string()
                }
            }),
            ColumnDecl::new("active", "Active")
                .percent(8.0)
                .render(|p: &Self| if p.active { "yes" } else { "no" }.to_string()),
            ColumnDecl::new("updated_at", "Updated")
                .percent(18.0)
                .render(|p: &Self| short_time(&p.updated_at)),
            ColumnDecl::new("id", "ID").percent(6.0).align(Align::Right),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub recipient: String,
    pub channel: &'static str,
    pub subject: &'static str,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}

impl Record for Notification {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, key: &str) -> Option<String> {
        Some(match key {
            "id" => self.id.to_string(),
            "recipient" => self.recipient.clone(),
            "channel" => self.channel.to_string(),
            "subject" => self.subject.to_string(),
            "read" => self.read.to_string(),
            "sent_at" => self.sent_at.to_rfc3339(),
            _ => return None,
        })
    }
}

impl Notification {
    pub const SEARCHABLE: &'static [&'static str] = &["recipient", "channel", "subject"];

    pub fn generate(count: usize) -> Vec<Self> {
        const SUBJECTS: [&str; 6] = [
            "Payment received",
            "Password changed",
            "Membership renewed",
            "Withdrawal approved",
            "New login detected",
            "Order shipped",
        ];
        let mut rng = seeded(0x5eed_0003);
        (1..=count as u64)
            .map(|id| Self {
                id,
                recipient: format!("{}@example.com", pick(&mut rng, &USERS)),
                channel: pick(&mut rng, &["email", "sms", "push"]),
                subject: pick(&mut rng, &SUBJECTS),
                read: rng.random_bool(1.0 / 3.0),
                sent_at: timestamp(id as i64 * 11),
            })
            .collect()
    }

    pub fn columns() -> Result<ColumnSet<Self>, ColumnError> {
        ColumnSet::new(vec![
            ColumnDecl::new("read", "")
                .percent(4.0)
                .render(|n: &Self| if n.read { " " } else { "●" }.to_string()),
            ColumnDecl::new("subject", "Subject").align(Align::Left),
            ColumnDecl::new("recipient", "Recipient").align(Align::Left),
            ColumnDecl::new("channel", "Channel").percent(10.0),
            ColumnDecl::new("sent_at", "Sent").percent(18.0).render(|n: &Self| short_time(&n.sent_at)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_deterministic() {
        let a = WalletTransaction::generate(50);
        let b = WalletTransaction::generate(50);
        assert_eq!(a.len(), 50);
        assert!(a.iter().zip(&b).all(|(x, y)| x.user == y.user && x.amount_cents == y.amount_cents));
    }

    #[test]
    fn column_sets_are_valid() {
        assert_eq!(WalletTransaction::columns().unwrap().len(), 6);
        assert_eq!(Product::columns().unwrap().len(), 8);
        assert_eq!(Notification::columns().unwrap().len(), 5);
    }

    #[test]
    fn searchable_keys_are_real_fields() {
        let t = &WalletTransaction::generate(1)[0];
        assert!(WalletTransaction::SEARCHABLE.iter().all(|k| t.field(k).is_some()));
        let p = &Product::generate(1)[0];
        assert!(Product::SEARCHABLE.iter().all(|k| p.field(k).is_some()));
        let n = &Notification::generate(1)[0];
        assert!(Notification::SEARCHABLE.iter().all(|k| n.field(k).is_some()));
    }

    #[test]
    fn renderers_format_raw_fields() {
        let t = WalletTransaction {
            id: 1,
            user: "alice".into(),
            kind: "withdrawal",
            amount_cents: -12_345,
            status: "pending",
            created_at: timestamp(0),
        };
        let columns = WalletTransaction::columns().unwrap();
        let amount = columns.get("amount").unwrap();
        assert_eq!(t.field("amount").as_deref(), Some("-123.45"));
        assert_eq!(amount.value(&t), "-$123.45");
        assert_eq!(columns.get("created_at").unwrap().value(&t), "2024-01-01 00:00");
        assert_eq!(columns.get("status").unwrap().value(&t), "PENDING");
    }
}
