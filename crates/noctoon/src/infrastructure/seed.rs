use crate::{
    domain::{
        entities::{
            chapter::Chapter,
            series::{Series, SeriesStatus},
            user::Role,
        },
        repositories::{chapter::ChapterRepository, series::SeriesRepository},
        services::user::UserService,
    },
    infrastructure::{
        config::SeedConfig,
        database::Pool,
        repositories::{
            chapter::ChapterRepositoryImpl, series::SeriesRepositoryImpl,
            user::UserRepositoryImpl,
        },
    },
};

const CHAPTERS_PER_SERIES: i64 = 5;

const SAMPLE_PAGES: [&str; 3] = [
    "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=800&h=1200&fit=crop&q=80",
    "https://images.unsplash.com/photo-1534447677768-be436bb09401?w=800&h=1200&fit=crop&q=80",
    "https://images.unsplash.com/photo-1462331940025-496dfbfc7564?w=800&h=1200&fit=crop&q=80",
];

struct SampleSeries {
    title: &'static str,
    description: &'static str,
    genre: &'static str,
    cover: &'static str,
    status: SeriesStatus,
    author: &'static str,
    views: i64,
    rating: i64,
}

const SAMPLE_CATALOG: [SampleSeries; 8] = [
    SampleSeries {
        title: "Karanlığın Çocuğu",
        description: "Karanlık güçlerle dolu bir dünyada hayatta kalmaya çalışan genç bir kahramanın destansı hikayesi.",
        genre: "Aksiyon",
        cover: "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=400&h=600&fit=crop",
        status: SeriesStatus::Ongoing,
        author: "Yuki Tanaka",
        views: 15420,
        rating: 92,
    },
    SampleSeries {
        title: "Gümüş Ay Efsanesi",
        description: "Antik bir kehanet, modern dünyada hayat buluyor.",
        genre: "Fantastik",
        cover: "https://images.unsplash.com/photo-1534447677768-be436bb09401?w=400&h=600&fit=crop",
        status: SeriesStatus::Completed,
        author: "Luna Silver",
        views: 28750,
        rating: 95,
    },
    SampleSeries {
        title: "Yıldız Tozu",
        description: "Uzayın derinliklerinde geçen bilim kurgu destanı.",
        genre: "Bilim Kurgu",
        cover: "https://images.unsplash.com/photo-1462331940025-496dfbfc7564?w=400&h=600&fit=crop",
        status: SeriesStatus::New,
        author: "Cosmos Writer",
        views: 5230,
        rating: 88,
    },
    SampleSeries {
        title: "Demir Şövalye",
        description: "Ortaçağ şövalye hikayesi.",
        genre: "Tarihi",
        cover: "https://images.unsplash.com/photo-1531686264889-56fdcabd163f?w=400&h=600&fit=crop",
        status: SeriesStatus::Ongoing,
        author: "Arthur Knight",
        views: 12890,
        rating: 90,
    },
    SampleSeries {
        title: "Aşkın Melodisi",
        description: "Müzik dünyasında romantik hikaye.",
        genre: "Romantik",
        cover: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=400&h=600&fit=crop",
        status: SeriesStatus::Completed,
        author: "Melody Rose",
        views: 45200,
        rating: 97,
    },
    SampleSeries {
        title: "Gölgelerin Efendisi",
        description: "Korku ve gerilim dolu gizem.",
        genre: "Korku",
        cover: "https://images.unsplash.com/photo-1509248961925-b5837da318b0?w=400&h=600&fit=crop",
        status: SeriesStatus::New,
        author: "Dark Shadow",
        views: 8900,
        rating: 85,
    },
    SampleSeries {
        title: "Komedi Kralı",
        description: "Eğlenceli maceralar.",
        genre: "Komedi",
        cover: "https://images.unsplash.com/photo-1527224857830-43a7acc85260?w=400&h=600&fit=crop",
        status: SeriesStatus::Ongoing,
        author: "Happy Writer",
        views: 22100,
        rating: 91,
    },
    SampleSeries {
        title: "Kader Oyunu",
        description: "Dramatik dönüşlerle dolu hikaye.",
        genre: "Dram",
        cover: "https://images.unsplash.com/photo-1518834107812-67b0b7c58434?w=400&h=600&fit=crop",
        status: SeriesStatus::Completed,
        author: "Drama Queen",
        views: 31500,
        rating: 94,
    },
];

/// Creates the admin account on an empty user table and, when enabled,
/// the sample catalog on an empty series table. Safe to run on every start.
pub async fn run(pool: &Pool, config: &SeedConfig) -> Result<(), anyhow::Error> {
    let user_svc = UserService::new(UserRepositoryImpl::new(pool.clone()));
    if user_svc.fetch_users_count().await? == 0 {
        let admin = user_svc
            .create_user(&config.admin_username, &config.admin_password, Role::Admin)
            .await?;
        info!("created admin user {}", admin.username);
    }

    if !config.sample_catalog {
        return Ok(());
    }

    let series_repo = SeriesRepositoryImpl::new(pool.clone());
    if series_repo.get_series_count().await? > 0 {
        debug!("catalog not empty, skip sample series");
        return Ok(());
    }

    let chapter_repo = ChapterRepositoryImpl::new(pool.clone());
    for sample in SAMPLE_CATALOG.iter() {
        let series = series_repo
            .insert_series(&Series {
                title: sample.title.to_string(),
                description: Some(sample.description.to_string()),
                genre: sample.genre.to_string(),
                cover: sample.cover.to_string(),
                status: sample.status,
                author: Some(sample.author.to_string()),
                views: sample.views,
                rating: sample.rating,
                ..Default::default()
            })
            .await?;

        for number in 1..=CHAPTERS_PER_SERIES {
            chapter_repo
                .insert_chapter(&Chapter {
                    series_id: series.id,
                    number,
                    title: format!("Bölüm {number}"),
                    pages: SAMPLE_PAGES.iter().map(|p| p.to_string()).collect(),
                    ..Default::default()
                })
                .await?;
        }
    }
    info!("seeded {} sample series", SAMPLE_CATALOG.len());

    Ok(())
}
