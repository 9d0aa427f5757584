// src/assemble/mod.rs

use anyhow::{Context, Result};
use arrow::array::{new_null_array, ArrayRef};
use arrow::compute::concat_batches;
use arrow::datatypes::{FieldRef, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::collections::HashSet;
use std::sync::Arc;

/// Concatenate every collected batch, in arrival order, into one table.
///
/// Monthly files do not all carry the same columns (yellow and green trips
/// differ, and columns appear over time), so batches are first aligned to the
/// union schema with nulls filling the gaps. No deduplication, validation, or
/// reordering happens here; arrival order is the row order of the result.
///
/// Zero input batches is the degenerate case, not an error: the result is an
/// empty table with no columns.
pub fn concat_all(batches: &[RecordBatch]) -> Result<RecordBatch> {
    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }

    let schema = union_schema(batches);
    let aligned = batches
        .iter()
        .map(|batch| align_to(batch, &schema))
        .collect::<Result<Vec<_>>>()?;

    concat_batches(&schema, aligned.iter()).context("concatenating aligned batches")
}

/// Union of every batch's columns, in first-seen order. When the same name
/// shows up twice the first occurrence decides the type.
fn union_schema(batches: &[RecordBatch]) -> SchemaRef {
    let mut fields: Vec<FieldRef> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for batch in batches {
        for field in batch.schema().fields() {
            if seen.insert(field.name().clone()) {
                fields.push(Arc::new(field.as_ref().clone().with_nullable(true)));
            }
        }
    }
    Arc::new(Schema::new(fields))
}

/// Project a batch onto `schema`, null-filling columns it does not have.
fn align_to(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| match batch.schema().index_of(field.name()) {
            Ok(idx) => batch.column(idx).clone(),
            Err(_) => new_null_array(field.data_type(), rows),
        })
        .collect();

    RecordBatch::try_new(schema.clone(), columns).context("aligning batch to union schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field};

    fn batch_a(values: &[i64]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int64, true)]));
        RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from_iter_values(values.iter().copied()))],
        )
        .unwrap()
    }

    fn batch_ab(values: &[i64], labels: &[&str]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int64, true),
            Field::new("b", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from_iter_values(values.iter().copied())),
                Arc::new(StringArray::from(labels.to_vec())),
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_input_yields_empty_table() -> Result<()> {
        let table = concat_all(&[])?;
        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 0);
        Ok(())
    }

    #[test]
    fn identical_schemas_concat_in_order() -> Result<()> {
        let table = concat_all(&[batch_a(&[1, 2]), batch_a(&[3])])?;
        assert_eq!(table.num_rows(), 3);
        let col = table
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        let values: Vec<i64> = col.iter().flatten().collect();
        assert_eq!(values, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn missing_columns_are_null_filled() -> Result<()> {
        let table = concat_all(&[batch_a(&[1, 2]), batch_ab(&[3], &["x"])])?;
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 2);

        // column order follows first appearance
        assert_eq!(table.schema().field(0).name(), "a");
        assert_eq!(table.schema().field(1).name(), "b");

        let b = table
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(b.null_count(), 2);
        assert_eq!(b.value(2), "x");
        Ok(())
    }

    #[test]
    fn wider_batch_first_keeps_its_column_order() -> Result<()> {
        let table = concat_all(&[batch_ab(&[1], &["x"]), batch_a(&[2])])?;
        assert_eq!(table.num_rows(), 2);
        let b = table
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(b.value(0), "x");
        assert!(b.is_null(1));
        Ok(())
    }
}
