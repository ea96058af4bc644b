//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use popcat::prelude::*;
//!
//! let registry = build_registry(&CatalogConfig::new("/nonexistent/cache")).unwrap();
//! let species = registry.get_species("dromel").unwrap();
//! let contig = species.get_contig("chr4", None, 1e-4).unwrap();
//! let model = species.get_model("ooa_2").unwrap();
//! let ts = model.run_with_seed(&contig, &model.get_samples(&[2, 2]), Some(1)).unwrap();
//! assert_eq!(ts.num_samples(), 4);
//! ```

pub use popcat_catalog::prelude::*;
pub use popcat_engine::prelude::*;
