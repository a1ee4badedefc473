// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use std::fs;
use std::path::Path;
use store_sales_analytics::domain::{
    Dataset, PeriodCapabilities, PeriodPair, Product, SalesFact, Store,
};

// ==========================================
// Store 构建器
// ==========================================

pub struct StoreBuilder {
    store: Store,
}

impl StoreBuilder {
    pub fn new(store_id: i64) -> Self {
        Self {
            store: Store::new(store_id, format!("Store {store_id}"), PeriodPair::new(100.0, 100.0)),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.store.name = name.to_string();
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.store.city = Some(city.to_string());
        self
    }

    pub fn annual(mut self, previous: f64, current: f64) -> Self {
        self.store.annual = PeriodPair::new(previous, current);
        self
    }

    pub fn half_year(mut self, h1: f64, h2: f64) -> Self {
        self.store.half_year = Some(PeriodPair::new(h1, h2));
        self
    }

    pub fn quarter_yoy(mut self, previous: f64, current: f64) -> Self {
        self.store.quarter_yoy = Some(PeriodPair::new(previous, current));
        self
    }

    pub fn quarter_seq(mut self, q2: f64, q3: f64) -> Self {
        self.store.quarter_seq = Some(PeriodPair::new(q2, q3));
        self
    }

    pub fn bimonthly(mut self, previous: f64, latest: f64) -> Self {
        self.store.bimonthly = Some(PeriodPair::new(previous, latest));
        self
    }

    pub fn build(self) -> Store {
        self.store
    }
}

// ==========================================
// SalesFact 构建器
// ==========================================

pub struct FactBuilder {
    fact: SalesFact,
}

impl FactBuilder {
    pub fn new(store_id: i64, product_id: i64) -> Self {
        Self {
            fact: SalesFact::new(store_id, product_id, PeriodPair::new(0.0, 0.0)),
        }
    }

    pub fn annual(mut self, previous: f64, current: f64) -> Self {
        self.fact.annual = PeriodPair::new(previous, current);
        self
    }

    pub fn bimonthly(mut self, previous: f64, latest: f64) -> Self {
        self.fact.bimonthly = Some(PeriodPair::new(previous, latest));
        self
    }

    pub fn names(mut self, store_name: &str, product_name: &str) -> Self {
        self.fact.store_name = Some(store_name.to_string());
        self.fact.product_name = Some(product_name.to_string());
        self
    }

    pub fn build(self) -> SalesFact {
        self.fact
    }
}

// ==========================================
// 数据集
// ==========================================

pub fn product(product_id: i64, category: &str, previous: f64, current: f64) -> Product {
    let mut p = Product::new(product_id, format!("Product {product_id}"), PeriodPair::new(previous, current));
    p.category = Some(category.to_string());
    p
}

pub fn dataset(
    capabilities: PeriodCapabilities,
    stores: Vec<Store>,
    products: Vec<Product>,
    sales: Vec<SalesFact>,
) -> Dataset {
    Dataset::new("test-v1", capabilities, stores, products, sales)
}

/// 只含全年 + 双月数据的能力描述
pub fn bimonthly_caps() -> PeriodCapabilities {
    PeriodCapabilities {
        bimonthly: true,
        ..PeriodCapabilities::default()
    }
}

/// 三家店的小型网络
///
/// - 门店1 (Haifa): 增长, 双月 +20%
/// - 门店2 (Haifa): 危险, 双月 -30%
/// - 门店3 (Eilat): 最近双月无销售 → 关店
pub fn small_network() -> Dataset {
    let stores = vec![
        StoreBuilder::new(1).city("Haifa").annual(1000.0, 1200.0).half_year(500.0, 650.0).bimonthly(100.0, 120.0).build(),
        StoreBuilder::new(2).city("Haifa").annual(1000.0, 700.0).half_year(500.0, 300.0).bimonthly(100.0, 70.0).build(),
        StoreBuilder::new(3).city("Eilat").annual(800.0, 400.0).half_year(400.0, 100.0).bimonthly(50.0, 0.0).build(),
    ];
    let products = vec![product(10, "Dairy", 300.0, 330.0), product(20, "Bakery", 200.0, 150.0)];
    let sales = vec![
        FactBuilder::new(1, 10).annual(100.0, 120.0).build(),
        FactBuilder::new(1, 20).annual(80.0, 60.0).build(),
        FactBuilder::new(2, 10).annual(150.0, 180.0).build(),
        FactBuilder::new(3, 10).annual(50.0, 30.0).build(),
    ];

    dataset(
        PeriodCapabilities { half_year: true, bimonthly: true, ..PeriodCapabilities::default() },
        stores,
        products,
        sales,
    )
}

// ==========================================
// CSV 数据目录
// ==========================================

pub fn write_csv_dataset(dir: &Path, stores: &str, products: &str, sales: &str) {
    fs::write(dir.join("stores.csv"), stores).unwrap();
    fs::write(dir.join("products.csv"), products).unwrap();
    fs::write(dir.join("store_products.csv"), sales).unwrap();
}
