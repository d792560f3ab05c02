#![allow(missing_docs)]

use std::sync::Arc;

use ncarray::NcError;
use ncarray::config::global_config_mut;
use ncarray::file::File;
use ncarray::storage::DimensionLength;
use ncarray::storage::store::MemoryStore;

#[test]
#[serial_test::serial]
fn config_trace_transfers() -> Result<(), Box<dyn std::error::Error>> {
    let root = File::create(Arc::new(MemoryStore::new()))?.root();
    root.add_dimension("x", DimensionLength::Fixed(4))?;
    let v = root.add_variable("v", "int", &["x"])?;

    testing_logger::setup();
    v.write_full(vec![1i32, 2, 3, 4])?;
    testing_logger::validate(|captured_logs| assert!(captured_logs.is_empty()));

    global_config_mut().set_trace_transfers(true);
    testing_logger::setup();
    let result = (|| {
        v.write_slice(&[1], &[2], vec![5i32, 6])?;
        v.read_strided::<Vec<i32>>(&[0], &[2], &[2])
    })();
    global_config_mut().set_trace_transfers(false);
    assert_eq!(result?, vec![1, 6]);

    testing_logger::validate(|captured_logs| {
        assert_eq!(captured_logs.len(), 2);
        assert_eq!(captured_logs[0].level, log::Level::Debug);
        assert!(captured_logs[0].body.starts_with("wrote 8 bytes to variable `v`"));
        assert_eq!(captured_logs[1].level, log::Level::Debug);
        assert!(captured_logs[1].body.starts_with("read 8 bytes from variable `v`"));
    });
    Ok(())
}

#[test]
#[serial_test::serial]
fn config_scalar_length_one() -> Result<(), Box<dyn std::error::Error>> {
    let root = File::create(Arc::new(MemoryStore::new()))?.root();
    root.add_dimension("one", DimensionLength::Fixed(1))?;
    let v = root.add_variable("v", "double", &["one"])?;
    v.write_scalar(2.5f64)?;
    assert_eq!(v.read_scalar::<f64>()?, 2.5);

    global_config_mut().set_scalar_length_one(false);
    let result = v.read_scalar::<f64>();
    global_config_mut().set_scalar_length_one(true);
    assert!(matches!(
        result,
        Err(NcError::RankMismatch {
            got: 0,
            expected: 1
        })
    ));
    Ok(())
}
