//! Binds the feature files to the step registry.

use crate::fixtures::{ResolutionContext, resolution_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/resolution.feature",
    fixtures = [resolution_context: ResolutionContext]
);
scenarios!(
    "tests/features/coercion.feature",
    fixtures = [resolution_context: ResolutionContext]
);
