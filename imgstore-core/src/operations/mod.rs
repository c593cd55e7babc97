pub mod delete_blob;
pub mod delete_name;
pub mod list_names;
pub mod put_blob;
pub mod put_named_blob;
pub mod read_blob;
pub mod read_named_blob;

pub use delete_blob::{
    DeleteBlobOperation, DeleteBlobOperationOutcome, DeleteBlobOperationRequest,
};
pub use delete_name::{
    DeleteNameOperation, DeleteNameOperationOutcome, DeleteNameOperationRequest,
};
pub use list_names::{ListNamesOperation, ListNamesOperationResult};
pub use put_blob::{
    PutBlobOperation, PutBlobOperationOutcome, PutBlobOperationRequest, PutBlobOperationResult,
};
pub use put_named_blob::{
    PutNamedBlobOperation, PutNamedBlobOperationOutcome, PutNamedBlobOperationRequest,
    PutNamedBlobOperationResult,
};
pub use read_blob::{
    ReadBlobOperation, ReadBlobOperationOutcome, ReadBlobOperationRequest, ReadBlobOperationResult,
};
pub use read_named_blob::{
    ReadNamedBlobOperation, ReadNamedBlobOperationOutcome, ReadNamedBlobOperationRequest,
    ReadNamedBlobOperationResult,
};
