use std::fmt;

#[derive(Debug, Clone)]
pub enum AppError {
    Validation(String),
    DuplicateCode(String),
    DuplicateUser(String),
    /// 会话缺失、过期、签名错误等统一归为此类，不区分具体原因
    Unauthenticated,
    InvalidCredentials,
    AlreadyAuthenticated,
    /// 非所有者与资源不存在对外表现一致
    Forbidden,
    NotFound(String),
    PasswordHash(String),
    TokenIssue(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "E001",
            AppError::DuplicateCode(_) => "E002",
            AppError::DuplicateUser(_) => "E003",
            AppError::Unauthenticated => "E004",
            AppError::InvalidCredentials => "E005",
            AppError::AlreadyAuthenticated => "E006",
            AppError::Forbidden => "E007",
            AppError::NotFound(_) => "E008",
            AppError::PasswordHash(_) => "E009",
            AppError::TokenIssue(_) => "E010",
            AppError::DatabaseConfig(_) => "E011",
            AppError::DatabaseConnection(_) => "E012",
            AppError::DatabaseOperation(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation Error",
            AppError::DuplicateCode(_) => "Duplicate Short Code",
            AppError::DuplicateUser(_) => "User Already Exists",
            AppError::Unauthenticated => "Authentication Required",
            AppError::InvalidCredentials => "Invalid Credentials",
            AppError::AlreadyAuthenticated => "Already Authenticated",
            AppError::Forbidden => "Forbidden",
            AppError::NotFound(_) => "Resource Not Found",
            AppError::PasswordHash(_) => "Password Hash Error",
            AppError::TokenIssue(_) => "Token Issue Error",
            AppError::DatabaseConfig(_) => "Database Configuration Error",
            AppError::DatabaseConnection(_) => "Database Connection Error",
            AppError::DatabaseOperation(_) => "Database Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::DuplicateCode(msg)
            | AppError::DuplicateUser(msg)
            | AppError::NotFound(msg)
            | AppError::PasswordHash(msg)
            | AppError::TokenIssue(msg)
            | AppError::DatabaseConfig(msg)
            | AppError::DatabaseConnection(msg)
            | AppError::DatabaseOperation(msg) => msg,
            AppError::Unauthenticated => "Authentication required",
            AppError::InvalidCredentials => "Invalid username or password",
            AppError::AlreadyAuthenticated => "Already signed in",
            AppError::Forbidden => "URL not owned by you",
        }
    }

    /// Whether the message is safe to hand back to a client verbatim.
    ///
    /// Storage, hashing and signing failures carry internal detail and are
    /// replaced with a generic text by the HTTP layer.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::DuplicateCode(_)
                | AppError::PasswordHash(_)
                | AppError::TokenIssue(_)
                | AppError::DatabaseConfig(_)
                | AppError::DatabaseConnection(_)
                | AppError::DatabaseOperation(_)
        )
    }

    /// 格式化为彩色输出（用于启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AppError {}

// 便捷的构造函数
impl AppError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn duplicate_code<T: Into<String>>(code: T) -> Self {
        AppError::DuplicateCode(format!("Short code '{}' already exists", code.into()))
    }

    pub fn duplicate_user<T: Into<String>>(username: T) -> Self {
        AppError::DuplicateUser(format!("User '{}' already exists", username.into()))
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        AppError::PasswordHash(msg.into())
    }

    pub fn token_issue<T: Into<String>>(msg: T) -> Self {
        AppError::TokenIssue(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AppError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AppError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AppError::DatabaseOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                AppError::DatabaseConnection(err.to_string())
            }
            _ => AppError::DatabaseOperation(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
