// ==========================================
// 员工表格入库 - 语句演示用实体
// ==========================================
// customer: 原始语句 / 参数化语句 CRUD 演示
// user:     登录场景下的 SQL 注入演示
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}
