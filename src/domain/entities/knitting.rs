use serde::{Deserialize, Serialize};

use crate::entities::picture::{PatternFile, PatternImage, Picture, YarnNeedleImage};

/// Row of the project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnittingListRes {
    pub id: i64,
    pub pattern_name_size: String,
    pub yarn: String,
    pub needles: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Full project record as returned by the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnittingInfoRes {
    pub id: i64,
    pub pattern_name_size: String,
    pub designer: String,
    pub origin_yarn: String,
    pub origin_gauge: String,
    pub origin_needle_size: String,
    pub origin_yardage: String,
    pub yarn: String,
    pub needles: String,
    pub gauge: String,
    pub yardage: String,
    #[serde(default)]
    pub contents: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub pattern_image: Option<PatternImage>,
    #[serde(default)]
    pub yarn_needle_image: Option<YarnNeedleImage>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[serde(default)]
    pub pattern_file: Option<PatternFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnittingDeleteReq {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnittingInfoReq {
    pub id: i64,
}
