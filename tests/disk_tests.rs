//! Simulated disk tests

use diskpart_tui::{
    disk::{
        size::{format_size, parse_size},
        validation::{validate_partition_name, DiskLimits},
        Disk, NewPartition, PartitionKind,
    },
    error::DiskError,
};

const GB: u64 = 1024;

fn disk() -> Disk {
    Disk::new(500 * GB, DiskLimits::default())
}

fn layout_total(disk: &Disk) -> u64 {
    disk.partitions().iter().map(|p| p.size_mb).sum()
}

fn names(disk: &Disk) -> Vec<&str> {
    disk.partitions().iter().map(|p| p.name.as_str()).collect()
}

fn new_partition(name: &str, size_mb: u64, kind: PartitionKind) -> NewPartition {
    NewPartition {
        name: name.to_string(),
        size_mb,
        kind,
    }
}

#[test]
fn test_default_layout() {
    let disk = disk();
    let sizes: Vec<(&str, u64, PartitionKind)> = disk
        .partitions()
        .iter()
        .map(|p| (p.name.as_str(), p.size_mb, p.kind))
        .collect();

    assert_eq!(
        sizes,
        vec![
            ("C:", 120 * GB, PartitionKind::Primary),
            ("D:", 200 * GB, PartitionKind::Logical),
            ("Unallocated", 180 * GB, PartitionKind::Unallocated),
        ]
    );
    assert_eq!(disk.partitions()[0].used_mb, Some(60 * GB));

    println!("✓ Default layout is C: 120 GB, D: 200 GB, 180 GB free");
}

#[test]
fn test_operations_preserve_total_size() {
    let mut disk = disk();
    let total = disk.total_size_mb();

    let e = disk
        .create(new_partition("E:", 50 * GB, PartitionKind::Primary))
        .expect("create")
        .id;
    assert_eq!(layout_total(&disk), total);

    let c = disk.partitions()[0].id;
    disk.shrink(c, 10 * GB).expect("shrink");
    assert_eq!(layout_total(&disk), total);

    disk.extend(c, 5 * GB).expect("extend");
    assert_eq!(layout_total(&disk), total);

    disk.delete(e).expect("delete");
    assert_eq!(layout_total(&disk), total);

    disk.reset();
    assert_eq!(layout_total(&disk), total);

    println!("✓ Every operation keeps the disk size constant");
}

#[test]
fn test_delete_coalesces_unallocated_neighbours() {
    let mut disk = disk();
    let e = disk
        .create(new_partition("E:", 50 * GB, PartitionKind::Logical))
        .expect("create")
        .id;
    assert_eq!(names(&disk), vec!["C:", "D:", "E:", "Unallocated"]);

    let d = disk.partitions()[1].id;
    disk.delete(d).expect("delete D:");
    assert_eq!(names(&disk), vec!["C:", "Unallocated", "E:", "Unallocated"]);

    disk.delete(e).expect("delete E:");
    assert_eq!(names(&disk), vec!["C:", "Unallocated"]);
    assert_eq!(disk.partitions()[1].size_mb, 380 * GB);

    println!("✓ Deleting merges adjacent unallocated space");
}

#[test]
fn test_extend_requires_adjacent_space() {
    let mut disk = disk();
    let c = disk.partitions()[0].id;
    let d = disk.partitions()[1].id;

    assert_eq!(disk.extend(c, GB).err(), Some(DiskError::NoAdjacentSpace));
    assert_eq!(disk.available_after(d), Ok(180 * GB));

    disk.extend(d, 180 * GB).expect("extend into all free space");
    assert_eq!(names(&disk), vec!["C:", "D:"]);
    assert_eq!(disk.total_unallocated(), 0);
    assert_eq!(disk.available_after(d), Err(DiskError::NoAdjacentSpace));

    println!("✓ Extend only grows into the slot right after the volume");
}

#[test]
fn test_shrink_creates_or_grows_following_space() {
    let mut disk = disk();
    let c = disk.partitions()[0].id;
    let d = disk.partitions()[1].id;

    disk.shrink(c, 20 * GB).expect("shrink C:");
    assert_eq!(names(&disk), vec!["C:", "Unallocated", "D:", "Unallocated"]);

    disk.shrink(d, 20 * GB).expect("shrink D:");
    assert_eq!(disk.partitions()[3].size_mb, 200 * GB);

    // Only 80% of the free space can be reclaimed
    let err = disk.shrink(c, 90 * GB).err();
    assert!(matches!(err, Some(DiskError::UnmovableFiles { .. })));

    println!("✓ Shrink hands its space to the following slot");
}

#[test]
fn test_create_rules() {
    let mut disk = disk();

    assert_eq!(
        disk.create(new_partition("tiny", 50, PartitionKind::Primary)).err(),
        Some(DiskError::SizeTooSmall { min_mb: 100 })
    );
    assert_eq!(
        disk.create(new_partition("c:", GB, PartitionKind::Primary)).err(),
        Some(DiskError::DuplicateName("c:".to_string()))
    );
    assert!(matches!(
        disk.create(new_partition("BIG", 181 * GB, PartitionKind::Primary)),
        Err(DiskError::InsufficientSpace { .. })
    ));

    for name in ["E:", "F:", "G:"] {
        disk.create(new_partition(name, GB, PartitionKind::Primary))
            .expect("primary fits");
    }
    assert_eq!(
        disk.create(new_partition("H:", GB, PartitionKind::Primary)).err(),
        Some(DiskError::TooManyPrimary { max: 4 })
    );
    disk.create(new_partition("H:", GB, PartitionKind::Logical))
        .expect("logical drives are not limited");

    println!("✓ Create enforces size, name, space and primary limits");
}

#[test]
fn test_name_rules() {
    let disk = disk();
    let partitions = disk.partitions();

    assert!(validate_partition_name("DATA_01", partitions).is_ok());
    assert!(validate_partition_name("Z:", partitions).is_ok());
    assert!(validate_partition_name("My Files", partitions).is_ok());
    assert_eq!(validate_partition_name("   ", partitions), Err(DiskError::EmptyName));
    assert_eq!(
        validate_partition_name("ABCDEFGHIJKL", partitions),
        Err(DiskError::NameTooLong)
    );
    assert_eq!(
        validate_partition_name("d:", partitions),
        Err(DiskError::DuplicateName("d:".to_string()))
    );
    assert_eq!(
        validate_partition_name("bad/name", partitions),
        Err(DiskError::InvalidNameCharacters)
    );

    println!("✓ Volume labels follow the OS naming rules");
}

#[test]
fn test_format_and_unallocated_guards() {
    let mut disk = disk();
    let c = disk.partitions()[0].id;
    let free = disk.partitions()[2].id;

    let formatted = disk.format(c).expect("format");
    assert_eq!(formatted.used_mb, Some(0));
    assert_eq!(formatted.free_mb, Some(120 * GB));

    assert_eq!(disk.format(free).err(), Some(DiskError::FormatUnallocated));
    assert_eq!(disk.delete(free).err(), Some(DiskError::DeleteUnallocated));

    println!("✓ Format wipes usage; unallocated space cannot be formatted or deleted");
}

#[test]
fn test_size_round_trip() {
    for text in ["50 GB", "1.5gb", "10240 MB", "512 mb", " 2 GB "] {
        let mb = parse_size(text);
        assert!(mb > 0, "{} should parse", text);
        assert_eq!(parse_size(&format_size(mb)), mb, "{} round trip", text);
    }
    assert_eq!(parse_size("fifty"), 0);
    assert_eq!(parse_size("50 TB"), 0);
    assert_eq!(format_size(1536), "1.5 GB");

    println!("✓ Parsed sizes format back to the same magnitude");
}
