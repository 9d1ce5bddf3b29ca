// Detail-page extraction driven by configured CSS selectors
use crate::config::DetailSelectors;
use crate::model::{JobDetails, ParserError};
use crate::normalizer::html_to_text;
use crate::scraper::HttpClient;
use scraper::{ElementRef, Html, Selector};

pub struct DetailParser {
    company: Option<Selector>,
    location: Option<Selector>,
    salary: Option<Selector>,
    employment_status: Option<Selector>,
    published: Option<Selector>,
    description: Option<Selector>,
    responsibilities: Option<Selector>,
    skills: Option<Selector>,
}

fn compile(selector: &Option<String>) -> Result<Option<Selector>, ParserError> {
    selector
        .as_deref()
        .map(|s| Selector::parse(s).map_err(|_| ParserError::InvalidSelector(s.to_string())))
        .transpose()
}

fn element_text(element: ElementRef) -> String {
    html_to_text(&element.inner_html())
}

impl DetailParser {
    pub fn new(selectors: &DetailSelectors) -> Result<Self, ParserError> {
        Ok(Self {
            company: compile(&selectors.company)?,
            location: compile(&selectors.location)?,
            salary: compile(&selectors.salary)?,
            employment_status: compile(&selectors.employment_status)?,
            published: compile(&selectors.published)?,
            description: compile(&selectors.description)?,
            responsibilities: compile(&selectors.responsibilities)?,
            skills: compile(&selectors.skills)?,
        })
    }

    pub fn parse(&self, html: &str) -> JobDetails {
        let document = Html::parse_document(html);

        let first = |selector: &Option<Selector>| -> Option<String> {
            let selector = selector.as_ref()?;
            document
                .select(selector)
                .map(element_text)
                .find(|text| !text.is_empty())
        };
        let all = |selector: &Option<Selector>| -> Vec<String> {
            match selector {
                Some(selector) => document
                    .select(selector)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect(),
                None => Vec::new(),
            }
        };

        JobDetails {
            company: first(&self.company),
            location: first(&self.location),
            salary: first(&self.salary),
            employment_status: first(&self.employment_status),
            published: first(&self.published),
            description: first(&self.description),
            responsibilities: all(&self.responsibilities),
            skills: all(&self.skills),
        }
    }

    pub async fn fetch(&self, client: &HttpClient, url: &str) -> Result<JobDetails, ParserError> {
        let html = client.get_text(url).await?;
        Ok(self.parse(&html))
    }
}
