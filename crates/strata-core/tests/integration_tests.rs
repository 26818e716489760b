//! Integration tests for strata-core services against mocked ports.

use std::io;
use std::sync::Arc;

use mockall::{mock, predicate::eq};
use strata_core::{
    application::{ApplicationError, RenderService, TemplateService},
    domain::{RenderContext, TemplateSource, always_fresh},
    error::{ErrorCategory, StrataResult},
    prelude::*,
};

mock! {
    pub Loader {}

    impl TemplateLoader for Loader {
        fn id(&self) -> &'static str;
        fn list_templates(&self) -> StrataResult<Vec<String>>;
        fn get_source(&self, name: &str) -> StrataResult<TemplateSource>;
    }
}

mock! {
    pub Renderer {}

    impl TemplateRenderer for Renderer {
        fn render(&self, name: &str, context: &RenderContext) -> StrataResult<String>;
    }
}

fn not_found(name: &str) -> StrataError {
    ApplicationError::TemplateNotFound {
        name: name.to_string(),
        source: Some(io::Error::from(io::ErrorKind::NotFound)),
    }
    .into()
}

#[test]
fn list_filters_by_extension_and_keeps_order() {
    let mut loader = MockLoader::new();
    loader.expect_id().return_const("mock");
    loader.expect_list_templates().times(1).returning(|| {
        Ok(vec![
            "z.html".to_string(),
            "style.css".to_string(),
            "sub/a.html".to_string(),
        ])
    });

    let service = TemplateService::new(Arc::new(loader));
    let names = service.list(&["html".to_string()]).unwrap();

    assert_eq!(names, vec!["z.html", "sub/a.html"]);
}

#[test]
fn list_without_filter_returns_everything() {
    let mut loader = MockLoader::new();
    loader.expect_id().return_const("mock");
    loader
        .expect_list_templates()
        .returning(|| Ok(vec!["a".to_string(), "b.txt".to_string()]));

    let service = TemplateService::new(Arc::new(loader));
    assert_eq!(service.list(&[]).unwrap().len(), 2);
}

#[test]
fn source_is_passed_through() {
    let mut loader = MockLoader::new();
    loader
        .expect_get_source()
        .with(eq("index.html"))
        .returning(|_| Ok(TemplateSource::new("<h1>hi</h1>", "index.html", always_fresh())));

    let service = TemplateService::new(Arc::new(loader));
    let src = service.source("index.html").unwrap();

    assert_eq!(src.source, "<h1>hi</h1>");
    assert_eq!(src.path, "index.html");
    assert!(src.is_up_to_date());
}

#[test]
fn exists_maps_not_found_to_false() {
    let mut loader = MockLoader::new();
    loader
        .expect_get_source()
        .with(eq("missing.html"))
        .returning(|name| Err(not_found(name)));
    loader
        .expect_get_source()
        .with(eq("present.html"))
        .returning(|name| Ok(TemplateSource::new("", name, always_fresh())));

    let service = TemplateService::new(Arc::new(loader));

    assert!(!service.exists("missing.html").unwrap());
    assert!(service.exists("present.html").unwrap());
}

#[test]
fn exists_propagates_backend_errors() {
    let mut loader = MockLoader::new();
    loader.expect_get_source().returning(|name| {
        Err(ApplicationError::Backend {
            path: name.to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        }
        .into())
    });

    let service = TemplateService::new(Arc::new(loader));
    let err = service.exists("locked.html").unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Internal);
}

#[test]
fn render_service_delegates_to_renderer() {
    let mut renderer = MockRenderer::new();
    renderer
        .expect_render()
        .withf(|name, ctx| name == "greet.txt" && ctx.get("name").is_some())
        .times(1)
        .returning(|_, ctx| Ok(format!("Hello {}", ctx.get("name").unwrap().as_str().unwrap())));

    let service = RenderService::new(Box::new(renderer));
    let ctx = RenderContext::new().with("name", "World");

    assert_eq!(service.render("greet.txt", &ctx).unwrap(), "Hello World");
}

#[test]
fn render_errors_surface_unchanged() {
    let mut renderer = MockRenderer::new();
    renderer
        .expect_render()
        .returning(|name, _| Err(not_found(name)));

    let service = RenderService::new(Box::new(renderer));
    let err = service.render("nope", &RenderContext::new()).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.category(), ErrorCategory::NotFound);
}
