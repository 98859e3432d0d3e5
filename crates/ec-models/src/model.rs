//! The contract shared by every full model.

use ec_model::{AssembledModel, ModelAssembler, ModelResult};
use ec_options::{ModelFamily, Options};
use tracing::info;

/// A full model: an option set and the submodels it selects.
pub trait FullModel: Send + Sync {
    fn name(&self) -> &str;

    fn family(&self) -> ModelFamily;

    fn options(&self) -> &Options;

    /// Every submodel the options select, in insertion order.
    fn assembler(&self) -> ModelResult<ModelAssembler>;

    /// Check the options against the model family, then assemble.
    fn build(&self) -> ModelResult<AssembledModel> {
        self.options().check_family(self.family())?;
        let assembler = self.assembler()?;
        info!(
            model = self.name(),
            family = %self.family(),
            submodels = assembler.submodel_names().len(),
            "building model"
        );
        assembler.assemble()
    }
}
