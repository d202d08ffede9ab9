use thiserror::Error;

///
/// All errors emitted while building or loading the print head geometry.
/// Any of these means the layout cannot be generated, so they are fatal at startup.
///
/// - `StitchZonesNotAscending`: When the stitch zone boundaries are not strictly ascending
///     Parameters:
///     - `zones`: The rejected boundaries
/// - `NoAddresses`: When the derived number of addresses per head is zero
/// - `EmptyGroupOrder`: When the column group order has no entries
/// - `InvalidGroupOrder`: When the column group order is not a permutation of `0..n`
///     Parameters:
///     - `order`: The rejected group order
/// - `UnevenGroups`: When the nozzles of a column cannot be split evenly between the groups
///     Parameters:
///     - `nozzles_per_column`: The configured column size
///     - `groups`: The number of groups
/// - `InvalidResolution`: When the resolution is not a positive, finite number
/// - `InvalidParameter`: A broad error for a physical parameter which is not usable
///     Parameters:
///     - `name`: The parameter name
///     - `reason`: What was wrong with it
/// - `Parse`: When a configuration document could not be deserialised
/// - `Io`: When a configuration file could not be read
///
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Stitch zone boundaries must be strictly ascending, got {:?}", .zones)]
    StitchZonesNotAscending { zones: [usize; 3] },

    #[error("The head geometry has no nozzle addresses")]
    NoAddresses,

    #[error("The column group order is empty")]
    EmptyGroupOrder,

    #[error("The column group order {:?} is not a permutation of its indices", .order)]
    InvalidGroupOrder { order: Vec<usize> },

    #[error("{} nozzles per column cannot be split into {} groups", .nozzles_per_column, .groups)]
    UnevenGroups { nozzles_per_column: usize, groups: usize },

    #[error("Invalid resolution: {} dpi", .0)]
    InvalidResolution(f64),

    #[error("Invalid geometry parameter `{}`: {}", .name, .reason)]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Could not parse geometry configuration. {}", .0)]
    Parse(#[from] serde_json::Error),

    #[error("Could not read geometry configuration. {}", .0)]
    Io(#[from] std::io::Error),
}
