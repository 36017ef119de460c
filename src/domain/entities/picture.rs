use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternImage {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YarnNeedleImage {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: i64,
}

/// The pattern PDF attached to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFile {
    pub id: i64,
}

/// Body of every sub-resource delete endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDeleteReq {
    pub id: i64,
}

/// The independently deletable images owned by a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResourceKind {
    PatternImage,
    YarnNeedleImage,
    Picture,
}

impl SubResourceKind {
    fn segment(self) -> &'static str {
        match self {
            SubResourceKind::PatternImage => "pattern",
            SubResourceKind::YarnNeedleImage => "yarn_needle",
            SubResourceKind::Picture => "picture",
        }
    }

    pub fn delete_path(self) -> String {
        format!("/api/v1/knitting/{}/delete", self.segment())
    }

    pub fn preview_path(self) -> String {
        format!("/api/v1/knitting/{}/preview", self.segment())
    }

    pub fn delete_confirm(self) -> &'static str {
        match self {
            SubResourceKind::PatternImage => "도안 사진을 삭제 하시겠습니까?",
            SubResourceKind::YarnNeedleImage => "실/바늘 사진을 삭제 하시겠습니까?",
            SubResourceKind::Picture => "사진을 삭제 하시겠습니까?",
        }
    }
}

impl fmt::Display for SubResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// A specific image of a project, addressed by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubResource {
    pub kind: SubResourceKind,
    pub id: i64,
}

impl SubResource {
    pub fn new(kind: SubResourceKind, id: i64) -> Self {
        SubResource { kind, id }
    }

    pub fn delete_request(&self) -> ImageDeleteReq {
        ImageDeleteReq { id: self.id }
    }
}

impl fmt::Display for SubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}
