#![allow(missing_docs)]

use std::sync::Arc;

use ncarray::NcError;
use ncarray::data_type::ElementType;
use ncarray::file::File;
use ncarray::group::Group;
use ncarray::storage::storage_adapter::performance_metrics::PerformanceMetricsStorageAdapter;
use ncarray::storage::store::MemoryStore;
use ncarray::storage::{DimensionLength, ReadableStorageTraits, StorageLayout};
use ncarray::variable::{ElementError, TypedBuffer, Variable};

fn root() -> Result<Group<MemoryStore>, NcError> {
    Ok(File::create(Arc::new(MemoryStore::new()))?.root())
}

/// `temp(time, lat, lon)` with an unlimited `time` dimension.
fn temp(root: &Group<MemoryStore>) -> Result<Variable<MemoryStore>, NcError> {
    root.add_dimension("time", DimensionLength::Unlimited)?;
    root.add_dimension("lat", DimensionLength::Fixed(3))?;
    root.add_dimension("lon", DimensionLength::Fixed(4))?;
    root.add_variable("temp", "float", &["time", "lat", "lon"])
}

#[test]
fn variable_round_trip_all_types() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("x", DimensionLength::Fixed(3))?;

    let buffers = [
        TypedBuffer::Byte(vec![-128, 0, 127]),
        TypedBuffer::Char(b"abc".to_vec()),
        TypedBuffer::Short(vec![i16::MIN, -1, i16::MAX]),
        TypedBuffer::Int(vec![i32::MIN, 0, i32::MAX]),
        TypedBuffer::Float(vec![-1.5, 0.0, f32::MAX]),
        TypedBuffer::Double(vec![f64::MIN_POSITIVE, -2.25, 1e300]),
        TypedBuffer::UByte(vec![0, 128, 255]),
        TypedBuffer::UShort(vec![0, 1, u16::MAX]),
        TypedBuffer::UInt(vec![0, 1, u32::MAX]),
        TypedBuffer::Int64(vec![i64::MIN, 1 << 40, i64::MAX]),
    ];
    for buffer in buffers {
        let element_type = buffer.element_type();
        let variable = root.add_variable(&format!("v_{element_type}"), element_type.name(), &["x"])?;
        variable.write_full(&buffer)?;
        assert_eq!(variable.read_full::<TypedBuffer>()?, buffer);
    }

    // Typed reads
    let int64 = root.variable("v_int64")?;
    assert_eq!(
        int64.read_full::<Vec<i64>>()?,
        vec![i64::MIN, 1 << 40, i64::MAX]
    );
    let char = root.variable("v_char")?;
    assert_eq!(char.read_full::<Vec<u8>>()?, b"abc".to_vec());
    Ok(())
}

#[test]
fn variable_temp_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    let temp = temp(&root)?;
    assert_eq!(temp.shape()?, vec![0, 3, 4]);
    assert_eq!(temp.element_type(), ElementType::Float);
    assert_eq!(temp.ndims(), 3);

    let data: Vec<f32> = (0..12u8).map(f32::from).collect();
    temp.write_slice(&[0, 0, 0], &[1, 3, 4], &data)?;
    assert_eq!(root.dimension("time")?.len()?, 1);
    assert_eq!(temp.shape()?, vec![1, 3, 4]);
    assert_eq!(temp.read_full::<Vec<f32>>()?, data);

    #[cfg(feature = "ndarray")]
    {
        let array = temp.read_full::<ndarray::Array3<f32>>()?;
        assert_eq!(array.shape(), &[1, 3, 4]);
        assert_eq!(array[[0, 2, 1]], 9.0);
    }
    Ok(())
}

#[test]
fn variable_slice_untouched_surroundings() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("y", DimensionLength::Fixed(4))?;
    root.add_dimension("x", DimensionLength::Fixed(4))?;
    let variable = root.add_variable("v", "int", &["y", "x"])?;
    variable.set_fill_value(0i32)?;

    variable.write_slice(&[1, 1], &[2, 2], vec![1i32, 2, 3, 4])?;
    assert_eq!(
        variable.read_slice::<Vec<i32>>(&[1, 1], &[2, 2])?,
        vec![1, 2, 3, 4]
    );
    assert_eq!(
        variable.read_full::<Vec<i32>>()?,
        vec![
            0, 0, 0, 0, //
            0, 1, 2, 0, //
            0, 3, 4, 0, //
            0, 0, 0, 0, //
        ]
    );
    Ok(())
}

#[test]
fn variable_unwritten_reads_fill_value() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("x", DimensionLength::Fixed(3))?;
    let variable = root.add_variable("v", "short", &["x"])?;
    assert_eq!(variable.fill_value::<i16>()?, -32767);
    variable.write_slice(&[1], &[1], &[5i16])?;
    assert_eq!(variable.read_full::<Vec<i16>>()?, vec![-32767, 5, -32767]);
    Ok(())
}

#[test]
fn variable_strided() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("y", DimensionLength::Fixed(4))?;
    root.add_dimension("x", DimensionLength::Fixed(5))?;
    let variable = root.add_variable("v", "ushort", &["y", "x"])?;
    let data: Vec<u16> = (0..20).collect();
    variable.write_full(&data)?;

    assert_eq!(
        variable.read_strided::<Vec<u16>>(&[0, 1], &[2, 2], &[2, 3])?,
        vec![1, 4, 11, 14]
    );

    variable.write_strided(&[1, 0], &[2, 3], &[2, 2], vec![100u16, 101, 102, 103, 104, 105])?;
    assert_eq!(
        variable.read_full::<Vec<u16>>()?,
        vec![
            0, 1, 2, 3, 4, //
            100, 6, 101, 8, 102, //
            10, 11, 12, 13, 14, //
            103, 16, 104, 18, 105, //
        ]
    );
    Ok(())
}

#[test]
fn variable_unit_stride_matches_slice() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("y", DimensionLength::Fixed(3))?;
    root.add_dimension("x", DimensionLength::Fixed(4))?;
    let a = root.add_variable("a", "double", &["y", "x"])?;
    let b = root.add_variable("b", "double", &["y", "x"])?;

    let data = vec![1.0f64, 2.0, 3.0, 4.0];
    a.write_slice(&[1, 1], &[2, 2], &data)?;
    b.write_strided(&[1, 1], &[2, 2], &[1, 1], &data)?;
    assert_eq!(a.read_full::<Vec<f64>>()?, b.read_full::<Vec<f64>>()?);
    assert_eq!(
        a.read_slice::<Vec<f64>>(&[0, 1], &[3, 3])?,
        a.read_strided::<Vec<f64>>(&[0, 1], &[3, 3], &[1, 1])?
    );
    Ok(())
}

#[test]
fn variable_rank_mismatch_no_transfer() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let metrics = Arc::new(PerformanceMetricsStorageAdapter::new(store.clone()));
    let root = File::create(metrics.clone())?.root();
    root.add_dimension("y", DimensionLength::Fixed(2))?;
    root.add_dimension("x", DimensionLength::Fixed(2))?;
    let variable = root.add_variable("v", "int", &["y", "x"])?;

    assert!(matches!(
        variable.read_slice::<Vec<i32>>(&[0], &[1]),
        Err(NcError::RankMismatch {
            got: 1,
            expected: 2
        })
    ));
    assert!(matches!(
        variable.read_strided::<Vec<i32>>(&[0, 0], &[1, 1], &[1, 1, 1]),
        Err(NcError::RankMismatch {
            got: 3,
            expected: 2
        })
    ));
    assert!(matches!(
        variable.write_slice(&[0, 0, 0], &[1, 1, 1], vec![1i32]),
        Err(NcError::RankMismatch {
            got: 3,
            expected: 2
        })
    ));
    assert_eq!(metrics.reads(), 0);
    assert_eq!(metrics.writes(), 0);

    // Validation precedes any store error
    store.set_read_only(true);
    assert!(matches!(
        variable.write_slice(&[0], &[1], vec![1i32]),
        Err(NcError::RankMismatch { .. })
    ));
    assert!(matches!(
        variable.write_slice(&[0, 0], &[1, 1], vec![1i32]),
        Err(NcError::StorageError(_))
    ));
    Ok(())
}

#[test]
fn variable_out_of_range_per_dimension() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("z", DimensionLength::Fixed(2))?;
    root.add_dimension("y", DimensionLength::Fixed(3))?;
    root.add_dimension("x", DimensionLength::Fixed(4))?;
    let variable = root.add_variable("v", "byte", &["z", "y", "x"])?;
    let shape = [2u64, 3, 4];

    for dimension in 0..3 {
        // start beyond the end
        let mut start = vec![0; 3];
        start[dimension] = shape[dimension];
        assert!(matches!(
            variable.read_slice::<Vec<i8>>(&start, &[1, 1, 1]),
            Err(NcError::OutOfRange(_))
        ));

        // start + (count - 1) * stride at the end
        let mut stride = vec![1; 3];
        stride[dimension] = shape[dimension];
        let mut count = vec![1; 3];
        count[dimension] = 2;
        assert!(matches!(
            variable.read_strided::<Vec<i8>>(&[0, 0, 0], &count, &stride),
            Err(NcError::OutOfRange(_))
        ));
        assert!(matches!(
            variable.write_strided(&[0, 0, 0], &count, &stride, vec![0i8; 2]),
            Err(NcError::OutOfRange(_))
        ));
    }

    // Zero stride
    assert!(matches!(
        variable.read_strided::<Vec<i8>>(&[0, 0, 0], &[1, 1, 1], &[1, 0, 1]),
        Err(NcError::OutOfRange(_))
    ));

    // The last element is in range
    assert_eq!(variable.read_slice::<Vec<i8>>(&[1, 2, 3], &[1, 1, 1])?, vec![-127]);
    Ok(())
}

#[test]
fn variable_unlimited_growth() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    let time = root.add_dimension("time", DimensionLength::Unlimited)?;
    let series = root.add_variable("series", "int64", &["time"])?;
    assert_eq!(time.len()?, 0);
    assert!(time.is_empty()?);
    assert!(time.is_unlimited()?);

    // Reading beyond the current length fails
    assert!(matches!(
        series.read_slice::<Vec<i64>>(&[0], &[1]),
        Err(NcError::OutOfRange(_))
    ));

    // write_full on a zero length unlimited dimension only accepts an empty buffer
    series.write_full(Vec::<i64>::new())?;
    assert!(matches!(
        series.write_full(vec![1i64]),
        Err(NcError::SizeMismatch {
            got: 1,
            expected: 0
        })
    ));
    assert_eq!(time.len()?, 0);

    series.write_slice(&[0], &[2], vec![1i64, 2])?;
    assert_eq!(time.len()?, 2);
    series.write_slice(&[4], &[1], vec![5i64])?;
    assert_eq!(time.len()?, 5);
    assert_eq!(series.shape()?, vec![5]);

    let fill = -9_223_372_036_854_775_806i64;
    assert_eq!(
        series.read_full::<Vec<i64>>()?,
        vec![1, 2, fill, fill, 5]
    );

    // write_full now covers the grown length
    series.write_full(vec![10i64, 20, 30, 40, 50])?;
    assert_eq!(series.read_slice::<Vec<i64>>(&[3], &[2])?, vec![40, 50]);
    Ok(())
}

#[test]
fn variable_unlimited_count_overflow() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let metrics = Arc::new(PerformanceMetricsStorageAdapter::new(store));
    let root = File::create(metrics.clone())?.root();
    root.add_dimension("t", DimensionLength::Unlimited)?;
    root.add_dimension("u", DimensionLength::Unlimited)?;
    let variable = root.add_variable("v", "int", &["t", "u"])?;

    // 2^32 * 2^32 elements cannot be addressed
    assert!(matches!(
        variable.write_slice(&[0, 0], &[1 << 32, 1 << 32], Vec::<i32>::new()),
        Err(NcError::OutOfRange(_))
    ));
    assert!(matches!(
        variable.write_strided(&[0, 0], &[1 << 32, 1 << 32], &[1, 1], Vec::<i32>::new()),
        Err(NcError::OutOfRange(_))
    ));
    assert_eq!(variable.shape()?, vec![0, 0]);
    assert_eq!(metrics.writes(), 0);

    // A zero count addresses nothing however large the other counts are
    variable.write_slice(&[0, 0], &[0, u64::MAX], Vec::<i32>::new())?;
    assert_eq!(variable.shape()?, vec![0, 0]);
    Ok(())
}

#[test]
fn variable_type_and_size_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("x", DimensionLength::Fixed(4))?;
    let variable = root.add_variable("v", "float", &["x"])?;

    assert!(matches!(
        variable.write_full(vec![1.0f64; 4]),
        Err(NcError::TypeMismatch(ElementError::IncompatibleElementType(
            ElementType::Float
        )))
    ));
    assert!(matches!(
        variable.read_full::<Vec<i32>>(),
        Err(NcError::TypeMismatch(_))
    ));
    assert!(matches!(
        variable.write_full(TypedBuffer::Double(vec![1.0; 4])),
        Err(NcError::TypeMismatch(_))
    ));
    assert!(matches!(
        variable.write_full(vec![1.0f32; 3]),
        Err(NcError::SizeMismatch {
            got: 3,
            expected: 4
        })
    ));
    assert!(matches!(
        variable.write_slice(&[1], &[2], &[1.0f32, 2.0, 3.0]),
        Err(NcError::SizeMismatch {
            got: 3,
            expected: 2
        })
    ));
    assert_eq!(
        variable.read_full::<Vec<f32>>()?,
        vec![9.969_209_968_386_869e36_f32; 4]
    );
    Ok(())
}

#[test]
fn variable_empty_transfers() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let metrics = Arc::new(PerformanceMetricsStorageAdapter::new(store));
    let root = File::create(metrics.clone())?.root();
    root.add_dimension("x", DimensionLength::Fixed(4))?;
    let variable = root.add_variable("v", "uint", &["x"])?;

    assert!(variable.read_slice::<Vec<u32>>(&[2], &[0])?.is_empty());
    variable.write_slice(&[4], &[0], Vec::<u32>::new())?;
    assert_eq!(metrics.reads(), 0);
    assert_eq!(metrics.writes(), 0);

    // The layout can still be changed
    variable.set_chunk_sizes(&[2])?;
    Ok(())
}

#[test]
fn variable_scalar() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    let scalar = root.add_variable("scalar", "double", &[])?;
    assert_eq!(scalar.ndims(), 0);
    assert_eq!(scalar.shape()?, Vec::<u64>::new());
    scalar.write_scalar(3.5f64)?;
    assert_eq!(scalar.read_scalar::<f64>()?, 3.5);
    assert_eq!(scalar.read_full::<Vec<f64>>()?, vec![3.5]);
    assert!(matches!(
        scalar.write_scalar(1i32),
        Err(NcError::TypeMismatch(_))
    ));

    root.add_dimension("one", DimensionLength::Fixed(1))?;
    root.add_dimension("two", DimensionLength::Fixed(2))?;
    let one = root.add_variable("one", "int", &["one"])?;
    one.write_scalar(7i32)?;
    assert_eq!(one.read_slice::<Vec<i32>>(&[0], &[1])?, vec![7]);
    assert_eq!(one.read_scalar::<i32>()?, 7);

    let two = root.add_variable("two", "int", &["two"])?;
    assert!(matches!(
        two.read_scalar::<i32>(),
        Err(NcError::SizeMismatch {
            got: 1,
            expected: 2
        })
    ));
    let matrix = root.add_variable("matrix", "int", &["one", "two"])?;
    assert!(matches!(
        matrix.write_scalar(1i32),
        Err(NcError::RankMismatch {
            got: 0,
            expected: 2
        })
    ));
    Ok(())
}

#[test]
fn variable_read_bytes_and_layout_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = File::create(store.clone())?.root();
    root.add_dimension("x", DimensionLength::Fixed(2))?;
    let variable = root.add_variable("v", "ushort", &["x"])?;
    variable.write_full(vec![0x0102u16, 0x0304])?;

    let bytes = variable.read_full::<bytes::Bytes>()?;
    assert_eq!(bytes.len(), 4);
    assert_eq!(&bytes[..2], &0x0102u16.to_ne_bytes());

    // The layout snapshot matches the store
    let layout: StorageLayout = variable.storage_layout()?;
    assert_eq!(layout, store.get_layout(variable.id())?);
    Ok(())
}

#[cfg(feature = "ndarray")]
#[test]
fn variable_ndarray() -> Result<(), Box<dyn std::error::Error>> {
    let root = root()?;
    root.add_dimension("y", DimensionLength::Fixed(2))?;
    root.add_dimension("x", DimensionLength::Fixed(3))?;
    let variable = root.add_variable("v", "int", &["y", "x"])?;

    variable.write_full(ndarray::array![[1i32, 2, 3], [4, 5, 6]])?;
    // A non-standard layout is written in C order
    variable.write_slice(&[0, 0], &[2, 2], ndarray::array![[10i32, 20], [30, 40]].reversed_axes())?;

    let array = variable.read_full::<ndarray::ArrayD<i32>>()?;
    assert_eq!(array.shape(), &[2, 3]);
    assert_eq!(
        array.into_raw_vec_and_offset().0,
        vec![10, 30, 3, 20, 40, 6]
    );
    assert!(matches!(
        variable.read_full::<ndarray::Array1<i32>>(),
        Err(NcError::RankMismatch { .. })
    ));

    // An owned slice only contributes its logical elements
    root.add_dimension("n", DimensionLength::Fixed(4))?;
    let variable = root.add_variable("w", "int", &["n"])?;
    let tail = || ndarray::Array1::from(vec![10i32, 20, 30, 40]).slice_move(ndarray::s![2..4]);
    assert!(matches!(
        variable.write_slice(&[0], &[4], tail()),
        Err(NcError::SizeMismatch {
            got: 2,
            expected: 4
        })
    ));
    variable.write_slice(&[1], &[2], tail())?;
    assert_eq!(variable.read_slice::<Vec<i32>>(&[1], &[2])?, vec![30, 40]);
    let strided =
        ndarray::Array1::from(vec![1i32, 2, 3, 4, 5, 6, 7, 8]).slice_move(ndarray::s![..;2]);
    variable.write_full(strided)?;
    assert_eq!(variable.read_full::<Vec<i32>>()?, vec![1, 3, 5, 7]);
    Ok(())
}
