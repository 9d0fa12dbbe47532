use std::collections::HashSet;
use std::fs;
use std::path::Path;
use clap::{Command, Arg, ArgAction};
use walkdir::WalkDir;

use utils_common::compression::to_compressed;
use utils_common::models::{Article, IndexType};
use utils_common::IndexError;

use article_filter::builder::FilterBuilder;
use article_filter::newest_first;

mod front_matter;
mod slug;

use front_matter::parse_front_matter;
use slug::derive_slug;

/// Markdown 文章的扩展名
const ARTICLE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// 扫描选项
#[derive(Debug, Clone, Copy, Default)]
struct ScanOptions {
    verbose: bool,
    include_drafts: bool,
}

/// 扫描结果
#[derive(Debug, Default)]
struct ScanReport {
    articles: Vec<Article>,
    skipped: usize,
    drafts: usize,
}

// 主函数
fn main() {
    // 设置命令行参数
    let matches = Command::new("文章索引生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("从 Markdown 文章生成搜索和标签索引")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE_DIR")
            .help("文章源目录路径")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("索引输出目录路径")
            .required(true))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("include_drafts")
            .short('d')
            .long("include-drafts")
            .help("包含 draft: true 的草稿文章")
            .action(ArgAction::SetTrue))
        .get_matches();

    // required 参数一定存在
    let (Some(source_dir), Some(output_dir)) = (
        matches.get_one::<String>("source"),
        matches.get_one::<String>("output"),
    ) else {
        eprintln!("错误: 缺少源目录或输出目录参数");
        std::process::exit(2);
    };
    let options = ScanOptions {
        verbose: matches.get_flag("verbose"),
        include_drafts: matches.get_flag("include_drafts"),
    };

    // 检查目录
    let source_path = Path::new(source_dir);
    if !source_path.is_dir() {
        eprintln!("错误: 源目录不存在或不是有效目录 '{}'", source_dir);
        std::process::exit(1);
    }

    // 创建输出目录
    let output_path = Path::new(output_dir);
    if let Err(e) = fs::create_dir_all(output_path) {
        eprintln!("错误: 无法创建输出目录 '{}': {}", output_dir, e);
        std::process::exit(1);
    }

    println!("开始生成索引...");
    println!("源目录: {}", source_dir);
    println!("输出目录: {}", output_dir);

    match generate_index(source_path, output_path, options) {
        Ok(count) => println!("索引生成成功！共 {} 篇文章", count),
        Err(e) => {
            eprintln!("错误: 索引生成失败: {}", e);
            std::process::exit(1);
        }
    }
}

/// 生成索引，返回写入的文章数量
fn generate_index(source_dir: &Path, output_dir: &Path, options: ScanOptions) -> Result<usize, IndexError> {
    let start_time = std::time::Instant::now();

    println!("扫描 Markdown 文件...");
    let report = scan_markdown_files(source_dir, options)?;
    println!(
        "扫描完成。找到 {} 篇文章，跳过 {} 个文件，其中草稿 {} 篇。",
        report.articles.len(),
        report.skipped,
        report.drafts
    );

    let articles = prepare_articles(report.articles)?;
    write_indexes(&articles, output_dir)?;

    let elapsed = start_time.elapsed();
    println!("索引生成完成！耗时: {:.2}秒", elapsed.as_secs_f32());

    Ok(articles.len())
}

/// 递归扫描源目录，解析每篇文章的元数据
fn scan_markdown_files(source_dir: &Path, options: ScanOptions) -> Result<ScanReport, IndexError> {
    let mut report = ScanReport::default();

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();

        if !entry.file_type().is_file() || !is_article_file(path) {
            continue;
        }

        match read_article(path, source_dir) {
            Ok(Some((article, draft))) => {
                if draft && !options.include_drafts {
                    report.drafts += 1;
                    report.skipped += 1;
                    if options.verbose {
                        println!("跳过草稿: {}", path.display());
                    }
                    continue;
                }
                if options.verbose {
                    println!("已索引: {} -> {}", path.display(), article.slug);
                }
                report.articles.push(article);
            }
            Ok(None) => {
                report.skipped += 1;
                if options.verbose {
                    println!("跳过没有标题的文件: {}", path.display());
                }
            }
            Err(e) => {
                report.skipped += 1;
                eprintln!("警告: {}", e);
            }
        }
    }

    Ok(report)
}

fn is_article_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ARTICLE_EXTENSIONS.contains(&ext))
}

/// 读取单篇文章，没有标题时返回 `None`，第二个值表示是否为草稿
fn read_article(path: &Path, source_dir: &Path) -> Result<Option<(Article, bool)>, IndexError> {
    let content = fs::read_to_string(path)?;
    let front_matter_error = |message: String| IndexError::FrontMatter {
        path: path.display().to_string(),
        message,
    };

    let Some(front) = parse_front_matter(&content).map_err(front_matter_error)? else {
        return Ok(None);
    };
    let Some(title) = front.title() else {
        return Ok(None);
    };

    let relative = path.strip_prefix(source_dir).unwrap_or(path);
    let article = Article {
        title: title.to_string(),
        tags: front.tags(),
        slug: derive_slug(relative),
        date: front.published().map_err(front_matter_error)?,
    };

    Ok(Some((article, front.draft)))
}

/// 检查路径唯一并按发布时间从新到旧排序
fn prepare_articles(mut articles: Vec<Article>) -> Result<Vec<Article>, IndexError> {
    if articles.is_empty() {
        return Err(IndexError::Empty);
    }

    let mut seen = HashSet::new();
    for article in &articles {
        if !seen.insert(article.slug.as_str()) {
            return Err(IndexError::DuplicateSlug(article.slug.clone()));
        }
    }

    articles.sort_by(newest_first);
    Ok(articles)
}

/// 写入 `articles.bin` 和 `tag_index.bin`
fn write_indexes(articles: &[Article], output_dir: &Path) -> Result<(), IndexError> {
    let articles_path = output_dir.join(IndexType::Articles.file_name());
    let data = to_compressed(&articles, IndexType::Articles.version())?;
    fs::write(&articles_path, &data)?;
    println!("文章索引已写入: {}，大小: {} 字节", articles_path.display(), data.len());

    let mut filter_builder = FilterBuilder::new();
    for article in articles {
        filter_builder.add_article(article.clone());
    }

    let tags_path = output_dir.join(IndexType::Tags.file_name());
    let size = filter_builder.save_tag_index(&tags_path)?;
    println!("标签索引已写入: {}，大小: {} 字节", tags_path.display(), size);

    Ok(())
}
