use crate::{llm::LanguageModel, scrape::ContentScraper, PipelineCoordinator};

pub struct PipelineCoordinatorBuilder<S = (), L = ()> {
    scraper: S,
    model: L,
}

impl PipelineCoordinatorBuilder {
    pub fn new() -> Self {
        Self {
            scraper: (),
            model: (),
        }
    }
}

impl Default for PipelineCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, L> PipelineCoordinatorBuilder<S, L> {
    pub fn scraper<S2: ContentScraper + Send + Sync + 'static>(
        self,
        scraper: S2,
    ) -> PipelineCoordinatorBuilder<S2, L> {
        PipelineCoordinatorBuilder {
            scraper,
            model: self.model,
        }
    }

    pub fn model<L2: LanguageModel + Send + Sync + 'static>(
        self,
        model: L2,
    ) -> PipelineCoordinatorBuilder<S, L2> {
        PipelineCoordinatorBuilder {
            scraper: self.scraper,
            model,
        }
    }
}

impl<S, L> PipelineCoordinatorBuilder<S, L>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
{
    pub fn build(self) -> PipelineCoordinator<S, L> {
        PipelineCoordinator::new(self.scraper, self.model)
    }
}
