pub mod request;

pub use request::{
    BackendReply, DocumentRequest, NewDocumentRequest, ReplyBody, RequestAction, RequestStatus,
};
