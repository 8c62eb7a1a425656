use serde::{Deserialize, Serialize};

// 单元内角色
//
// 教师身份不是全局属性，而是挂在具体单元的注册记录上。
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationRole {
    Student, // 学生
    Teacher, // 教师
}

impl RegistrationRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
}

impl<'de> Deserialize<'de> for RegistrationRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            RegistrationRole::STUDENT => Ok(RegistrationRole::Student),
            RegistrationRole::TEACHER => Ok(RegistrationRole::Teacher),
            _ => Err(serde::de::Error::custom(format!(
                "无效的单元角色: '{s}'. 支持的角色: student, teacher"
            ))),
        }
    }
}

impl std::fmt::Display for RegistrationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationRole::Student => write!(f, "{}", RegistrationRole::STUDENT),
            RegistrationRole::Teacher => write!(f, "{}", RegistrationRole::TEACHER),
        }
    }
}

impl std::str::FromStr for RegistrationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(RegistrationRole::Student),
            "teacher" => Ok(RegistrationRole::Teacher),
            _ => Err(format!("Invalid registration role: {s}")),
        }
    }
}

// 选课注册实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub unit_id: i64,
    pub user_id: i64,
    pub role: RegistrationRole,
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

impl Registration {
    pub fn is_teacher(&self) -> bool {
        self.role == RegistrationRole::Teacher
    }
}
