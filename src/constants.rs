pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_RECORD_ID: i64 = 0;

pub const DEFAULT_LONG_PRESS_THRESHOLD_MS: u64 = 500;
pub const DEFAULT_SUCCESS_TOAST_MS: u64 = 1000;
pub const DEFAULT_ERROR_TOAST_MS: u64 = 2000;
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

// ───── Endpoints ─────────────────────────────────────────────────────
pub const KNITTING_LIST_PATH: &str = "/api/v1/knitting/list";
pub const KNITTING_INFO_PATH: &str = "/api/v1/knitting/info";
pub const KNITTING_CREATE_PATH: &str = "/api/v1/knitting/create";
pub const KNITTING_UPDATE_PATH: &str = "/api/v1/knitting/update";
pub const KNITTING_DELETE_PATH: &str = "/api/v1/knitting/delete";

// ───── User-facing messages ──────────────────────────────────────────
pub const EMPTY_LIST_MESSAGE: &str = "데이터가 존재 하지 않습니다.";
pub const CREATE_CONFIRM: &str = "저장 하시겠습니까?";
pub const CREATE_SUCCESS: &str = "저장 되었습니다.";
pub const UPDATE_CONFIRM: &str = "수정 하시겠습니까?";
pub const UPDATE_SUCCESS: &str = "수정 되었습니다.";
pub const DELETE_CONFIRM: &str = "데이터를 삭제 하시겠습니까?";
pub const DELETE_SUCCESS: &str = "삭제 되었습니다.";
pub const PATTERN_FILE_PRESENT: &str = "도안(O)";
