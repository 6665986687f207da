mod statement;
pub use statement::QueryStatement;

mod cell;
pub use cell::{CellValue, ColumnType};

mod native_row;
pub use native_row::{ColumnDescriptor, NativeRow};

mod row;
pub use row::{Row, RowError};

mod query_result;
pub use query_result::QueryResult;

mod labels;
pub use labels::{LabelAssignment, LabelSchema};
